//! The task record and its lifecycle states.

/// A unit of work released into the simulation at `arrival` and requiring
/// `duration_total` ticks of CPU time to finish.
///
/// Owned by whichever structure currently holds it (ready queue, running
/// slot, or completed ledger) — moves between them are handoffs, never
/// shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub arrival: u64,
    pub duration_total: u64,
    pub duration_remaining: u64,
    pub priority_static: i64,
    pub priority_dynamic: i64,
    /// Assigned once, at admission into the ready queue; breaks ties between
    /// equal ordering keys so earlier-admitted tasks run first.
    pub admission_seq: u64,
    /// Ticks left in the current Round Robin quantum. Unused by other policies.
    pub quantum_left: u32,
}

impl Task {
    pub fn new(
        id: String,
        arrival: u64,
        duration_total: u64,
        priority_static: i64,
    ) -> Self {
        Self {
            id,
            arrival,
            duration_total,
            duration_remaining: duration_total,
            priority_static,
            priority_dynamic: priority_static,
            admission_seq: 0,
            quantum_left: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.duration_remaining == 0
    }
}

/// A finalized record, produced the tick a task's `duration_remaining`
/// reaches zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTask {
    pub id: String,
    pub arrival: u64,
    pub finish: u64,
    pub turnaround: u64,
    pub waiting: u64,
}

impl CompletedTask {
    /// `waiting = turnaround - duration_total`, the canonical form adopted
    /// uniformly across all policies (see DESIGN.md for the source
    /// ambiguity this resolves).
    pub fn finalize(task: &Task, finish: u64) -> Self {
        let turnaround = finish - task.arrival;
        let waiting = turnaround - task.duration_total;
        Self {
            id: task.id.clone(),
            arrival: task.arrival,
            finish,
            turnaround,
            waiting,
        }
    }
}
