//! Trace accumulation and the final statistics file, per spec §6.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::task::CompletedTask;

/// Accumulates the per-tick execution trace and the completed-task ledger
/// as the Scheduler runs, then renders `algoritmo_<policy>.txt` on drain.
/// Not a concurrent task — the Scheduler owns and calls into this directly.
#[derive(Default)]
pub struct StatsWriter {
    trace: Vec<String>,
    completed: Vec<CompletedTask>,
}

impl StatsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_tick(&mut self, running_id: &str) {
        self.trace.push(running_id.to_string());
    }

    pub fn record_completion(&mut self, task: CompletedTask) {
        self.completed.push(task);
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    pub fn completed(&self) -> &[CompletedTask] {
        &self.completed
    }

    /// Ceiling-round to one decimal place, matching the original's
    /// `math.ceil(mean * 10) / 10`.
    fn round_up_one_decimal(mean: f64) -> f64 {
        (mean * 10.0).ceil() / 10.0
    }

    fn means(&self) -> (f64, f64) {
        if self.completed.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.completed.len() as f64;
        let total_turnaround: u64 = self.completed.iter().map(|t| t.turnaround).sum();
        let total_waiting: u64 = self.completed.iter().map(|t| t.waiting).sum();
        (
            Self::round_up_one_decimal(total_turnaround as f64 / n),
            Self::round_up_one_decimal(total_waiting as f64 / n),
        )
    }

    /// Render the statistics file body as a string (used directly by tests,
    /// and by `write_to` for the on-disk form).
    pub fn render(&self) -> String {
        let mut sorted = self.completed.clone();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut out = String::new();
        for id in &self.trace {
            out.push_str(id);
            out.push(';');
        }
        out.push('\n');
        out.push('\n');
        for task in &sorted {
            out.push_str(&format!(
                "{};{};{};{};{}\n",
                task.id, task.arrival, task.finish, task.turnaround, task.waiting
            ));
        }
        let (mean_turnaround, mean_waiting) = self.means();
        out.push_str(&format!("{:.1};{:.1}\n", mean_turnaround, mean_waiting));
        out
    }

    pub fn output_path(output_dir: &Path, policy: &str) -> PathBuf {
        output_dir.join(format!("algoritmo_{policy}.txt"))
    }

    pub fn write_to(&self, output_dir: &Path, policy: &str) -> Result<PathBuf, SimError> {
        let path = Self::output_path(output_dir, policy);
        let mut file = std::fs::File::create(&path).map_err(|source| SimError::Output {
            path: path.clone(),
            source,
        })?;
        file.write_all(self.render().as_bytes())
            .map_err(|source| SimError::Output {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(id: &str, arrival: u64, finish: u64, total: u64) -> CompletedTask {
        CompletedTask {
            id: id.to_string(),
            arrival,
            finish,
            turnaround: finish - arrival,
            waiting: (finish - arrival) - total,
        }
    }

    #[test]
    fn empty_run_reports_zero_means() {
        let w = StatsWriter::new();
        assert_eq!(w.render(), "\n\n0.0;0.0\n");
    }

    #[test]
    fn round_up_boundary_rounds_away_from_exact() {
        // 2.31 rounds up to 2.4, never down.
        assert_eq!(StatsWriter::round_up_one_decimal(2.31), 2.4);
        // already exact to one decimal: unaffected.
        assert_eq!(StatsWriter::round_up_one_decimal(2.0), 2.0);
    }

    #[test]
    fn scenario_a_fcfs_render_matches_expected_layout() {
        let mut w = StatsWriter::new();
        for id in ["t0", "t0", "t0", "t1", "t1", "t2"] {
            w.record_tick(id);
        }
        w.record_completion(completed("t0", 0, 3, 3));
        w.record_completion(completed("t1", 1, 5, 2));
        w.record_completion(completed("t2", 2, 6, 1));

        let expected = "t0;t0;t0;t1;t1;t2;\n\n\
t0;0;3;3;0\n\
t1;1;5;4;2\n\
t2;2;6;4;3\n\
3.7;1.7\n";
        assert_eq!(w.render(), expected);
    }

    #[test]
    fn completed_tasks_are_sorted_by_id_not_completion_order() {
        let mut w = StatsWriter::new();
        w.record_completion(completed("t2", 2, 6, 1));
        w.record_completion(completed("t0", 0, 3, 3));
        w.record_completion(completed("t1", 1, 5, 2));
        let rendered = w.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2].split(';').next().unwrap(), "t0");
        assert_eq!(lines[3].split(';').next().unwrap(), "t1");
        assert_eq!(lines[4].split(';').next().unwrap(), "t2");
    }
}
