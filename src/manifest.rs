//! Manifest loading: `id;arrival;duration;priority`, one task per line.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ManifestError;
use crate::task::Task;

/// Parse a single manifest line. Returns `None` (with a warning logged by
/// the caller) for blank or malformed lines rather than failing the whole
/// load — a single bad line must not sink an entire run.
fn parse_line(line: &str) -> Option<Task> {
    let fields: Vec<&str> = line.split(';').collect();
    if fields.len() != 4 {
        return None;
    }
    let id = fields[0].trim();
    if id.is_empty() {
        return None;
    }
    let arrival: u64 = fields[1].trim().parse().ok()?;
    let duration: u64 = fields[2].trim().parse().ok()?;
    if duration == 0 {
        return None;
    }
    let priority: i64 = fields[3].trim().parse().ok()?;
    Some(Task::new(id.to_string(), arrival, duration, priority))
}

/// Load a manifest, grouping tasks by arrival tick and preserving manifest
/// order among same-arrival ties (the Emitter drains each arrival's list in
/// this order).
pub fn load_manifest(path: &Path) -> Result<BTreeMap<u64, Vec<Task>>, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;

    let mut by_arrival: BTreeMap<u64, Vec<Task>> = BTreeMap::new();
    for (lineno, raw) in contents.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_line(trimmed) {
            Some(task) => by_arrival.entry(task.arrival).or_default().push(task),
            None => {
                tracing::warn!(line = lineno + 1, text = trimmed, "skipping malformed manifest line");
            }
        }
    }
    Ok(by_arrival)
}
