//! The seven scheduling policies, expressed as one capability trait per
//! DESIGN NOTES §9 instead of a class hierarchy: a policy is nothing but
//! an ordering key, a preemption predicate, and two small hooks invoked at
//! dispatch and at aging time. The per-tick skeleton in `scheduler.rs` is
//! the same function for all seven; only these four things vary.

use crate::queue::ReadyQueue;
use crate::task::Task;

pub trait Policy {
    fn code(&self) -> PolicyKind;

    /// Ascending-order key: smallest value is selected first.
    fn key(&self, task: &Task) -> i64;

    fn preemptive(&self) -> bool;

    /// Called once per tick, only when `Running` is non-empty and a
    /// preemptive policy is active. `admitted_this_tick` is true if at
    /// least one admission (or, for `priod`, a completion) has occurred
    /// since aging last ran.
    fn should_preempt(&self, running: &Task, head: &Task, admitted_this_tick: bool) -> bool;

    /// Invoked right after a task moves from ReadyQueue into RunningSlot.
    fn on_dispatch(&self, _task: &mut Task) {}

    /// Invoked once per tick, after execution, for policies with dynamic
    /// per-tick state (aging). A no-op for everything but `priod`.
    fn on_aging(&self, _queue: &mut ReadyQueue) {}

    /// `Some(Q)` only for Round Robin.
    fn quantum(&self) -> Option<u32> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Prioc,
    Rr,
    Srtf,
    Priop,
    Priod,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Fcfs => "fcfs",
            PolicyKind::Sjf => "sjf",
            PolicyKind::Prioc => "prioc",
            PolicyKind::Rr => "rr",
            PolicyKind::Srtf => "srtf",
            PolicyKind::Priop => "priop",
            PolicyKind::Priod => "priod",
        }
    }

    pub fn build(self, quantum: u32) -> Box<dyn Policy + Send> {
        match self {
            PolicyKind::Fcfs => Box::new(Fcfs),
            PolicyKind::Sjf => Box::new(Sjf),
            PolicyKind::Prioc => Box::new(Prioc),
            PolicyKind::Rr => Box::new(Rr { quantum }),
            PolicyKind::Srtf => Box::new(Srtf),
            PolicyKind::Priop => Box::new(Priop),
            PolicyKind::Priod => Box::new(Priod),
        }
    }
}

pub struct Fcfs;
impl Policy for Fcfs {
    fn code(&self) -> PolicyKind {
        PolicyKind::Fcfs
    }
    fn key(&self, _task: &Task) -> i64 {
        0
    }
    fn preemptive(&self) -> bool {
        false
    }
    fn should_preempt(&self, _running: &Task, _head: &Task, _admitted_this_tick: bool) -> bool {
        false
    }
}

pub struct Sjf;
impl Policy for Sjf {
    fn code(&self) -> PolicyKind {
        PolicyKind::Sjf
    }
    fn key(&self, task: &Task) -> i64 {
        task.duration_remaining as i64
    }
    fn preemptive(&self) -> bool {
        false
    }
    fn should_preempt(&self, _running: &Task, _head: &Task, _admitted_this_tick: bool) -> bool {
        false
    }
}

pub struct Prioc;
impl Policy for Prioc {
    fn code(&self) -> PolicyKind {
        PolicyKind::Prioc
    }
    fn key(&self, task: &Task) -> i64 {
        task.priority_static
    }
    fn preemptive(&self) -> bool {
        false
    }
    fn should_preempt(&self, _running: &Task, _head: &Task, _admitted_this_tick: bool) -> bool {
        false
    }
}

pub struct Rr {
    pub quantum: u32,
}
impl Policy for Rr {
    fn code(&self) -> PolicyKind {
        PolicyKind::Rr
    }
    fn key(&self, _task: &Task) -> i64 {
        0
    }
    fn preemptive(&self) -> bool {
        true
    }
    fn should_preempt(&self, running: &Task, _head: &Task, _admitted_this_tick: bool) -> bool {
        running.quantum_left == 0
    }
    fn on_dispatch(&self, task: &mut Task) {
        task.quantum_left = self.quantum;
    }
}

pub struct Srtf;
impl Policy for Srtf {
    fn code(&self) -> PolicyKind {
        PolicyKind::Srtf
    }
    fn key(&self, task: &Task) -> i64 {
        task.duration_remaining as i64
    }
    fn preemptive(&self) -> bool {
        true
    }
    fn should_preempt(&self, running: &Task, head: &Task, admitted_this_tick: bool) -> bool {
        admitted_this_tick && head.duration_remaining < running.duration_remaining
    }
}

pub struct Priop;
impl Policy for Priop {
    fn code(&self) -> PolicyKind {
        PolicyKind::Priop
    }
    fn key(&self, task: &Task) -> i64 {
        task.priority_dynamic
    }
    fn preemptive(&self) -> bool {
        true
    }
    fn should_preempt(&self, running: &Task, head: &Task, admitted_this_tick: bool) -> bool {
        admitted_this_tick && head.priority_dynamic < running.priority_dynamic
    }
}

pub struct Priod;
impl Policy for Priod {
    fn code(&self) -> PolicyKind {
        PolicyKind::Priod
    }
    fn key(&self, task: &Task) -> i64 {
        task.priority_dynamic
    }
    fn preemptive(&self) -> bool {
        true
    }
    fn should_preempt(&self, running: &Task, head: &Task, admitted_this_tick: bool) -> bool {
        admitted_this_tick && head.priority_dynamic < running.priority_dynamic
    }
    fn on_dispatch(&self, task: &mut Task) {
        task.priority_dynamic = task.priority_static;
    }
    fn on_aging(&self, queue: &mut ReadyQueue) {
        queue.age_and_rekey(|t| t.priority_dynamic -= 1, |t| t.priority_dynamic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, duration_remaining: u64, priority: i64) -> Task {
        let mut t = Task::new(id.to_string(), 0, duration_remaining.max(1), priority);
        t.duration_remaining = duration_remaining;
        t
    }

    #[test]
    fn srtf_preempts_only_on_admission() {
        let policy = Srtf;
        let running = task("running", 5, 0);
        let head = task("head", 2, 0);
        assert!(policy.should_preempt(&running, &head, true));
        assert!(!policy.should_preempt(&running, &head, false));
    }

    #[test]
    fn srtf_does_not_preempt_when_head_is_not_shorter() {
        let policy = Srtf;
        let running = task("running", 2, 0);
        let head = task("head", 5, 0);
        assert!(!policy.should_preempt(&running, &head, true));
    }

    #[test]
    fn rr_preempts_on_quantum_exhaustion_regardless_of_admission_flag() {
        let policy = Rr { quantum: 3 };
        let mut running = task("running", 5, 0);
        running.quantum_left = 0;
        let head = task("head", 100, 0);
        assert!(policy.should_preempt(&running, &head, false));
        running.quantum_left = 1;
        assert!(!policy.should_preempt(&running, &head, false));
    }

    #[test]
    fn rr_on_dispatch_resets_quantum() {
        let policy = Rr { quantum: 3 };
        let mut t = task("t", 10, 0);
        t.quantum_left = 0;
        policy.on_dispatch(&mut t);
        assert_eq!(t.quantum_left, 3);
    }

    #[test]
    fn priod_on_dispatch_resets_dynamic_priority() {
        let policy = Priod;
        let mut t = task("t", 5, 3);
        t.priority_dynamic = -7;
        policy.on_dispatch(&mut t);
        assert_eq!(t.priority_dynamic, 3);
    }

    #[test]
    fn priod_aging_lowers_every_queued_task() {
        let policy = Priod;
        let mut q = ReadyQueue::new();
        q.insert(5, task("a", 1, 5));
        q.insert(3, task("b", 1, 3));
        policy.on_aging(&mut q);
        let mut remaining: Vec<(String, i64)> = q
            .iter()
            .map(|t| (t.id.clone(), t.priority_dynamic))
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec![("a".to_string(), 4), ("b".to_string(), 2)]);
    }

    #[test]
    fn non_preemptive_policies_never_preempt() {
        let running = task("running", 5, 5);
        let head = task("head", 1, 1);
        assert!(!Fcfs.should_preempt(&running, &head, true));
        assert!(!Sjf.should_preempt(&running, &head, true));
        assert!(!Prioc.should_preempt(&running, &head, true));
    }
}
