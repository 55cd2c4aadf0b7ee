//! The Scheduler: the hard core of the simulator. Maintains the ready
//! queue, the running slot, and the completed-task ledger; consumes ticks
//! and new-task admissions off its single inbound queue; dispatches one of
//! seven policies through the shared per-tick skeleton (spec §4.3).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::messages::{ClockMsg, EmitterMsg, SchedulerMsg};
use crate::policy::{Policy, PolicyKind};
use crate::queue::ReadyQueue;
use crate::stats::StatsWriter;
use crate::task::{CompletedTask, Task};

/// The mutable state the per-tick algorithm operates on. Kept separate
/// from the message-pump loop in `run` so the algorithm itself is plain,
/// synchronous, and directly unit-testable without any channels at all.
#[derive(Default)]
pub struct SchedulerState {
    pub ready: ReadyQueue,
    pub running: Option<Task>,
    pub stats: StatsWriter,
    admission_occurred_this_tick: bool,
    pub tasks_done: bool,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly-arrived task into the ready queue and mark this
    /// tick as admission-bearing (consulted by `srtf`/`priop`/`priod`
    /// preemption and by `priod` aging).
    pub fn admit(&mut self, policy: &dyn Policy, task: Task) {
        let key = policy.key(&task);
        self.ready.insert(key, task);
        self.admission_occurred_this_tick = true;
    }

    fn dispatch_from_queue(&mut self, policy: &dyn Policy) {
        if let Some(mut task) = self.ready.pop_head() {
            policy.on_dispatch(&mut task);
            self.running = Some(task);
        }
    }

    fn dispatch_or_preempt(&mut self, policy: &dyn Policy) {
        if self.running.is_none() {
            self.dispatch_from_queue(policy);
            return;
        }
        if !policy.preemptive() {
            return;
        }
        let should_swap = match (self.running.as_ref(), self.ready.peek_head()) {
            // A task whose duration has already run out is done, not merely
            // due for preemption — step 4 (finalize) must see it before
            // anything swaps it back into the ready queue. Without this
            // guard, a quantum/priority comparison that fires on the exact
            // tick a task completes requeues a zombie record with
            // duration_remaining == 0, which later panics in `execute_one`.
            (Some(running), Some(_)) if running.duration_remaining == 0 => false,
            (Some(running), Some(head)) => {
                policy.should_preempt(running, head, self.admission_occurred_this_tick)
            }
            _ => false,
        };
        if !should_swap {
            return;
        }
        let old_running = self.running.take().expect("running checked Some above");
        let key = policy.key(&old_running);
        self.ready.insert(key, old_running);
        if policy.quantum().is_some() {
            // Round Robin: "push running to tail, clear slot, go to step
            // 2" — the incoming task is dispatched through the normal
            // idle path, which is what resets its quantum.
            self.dispatch_from_queue(policy);
        } else {
            // srtf/priop/priod: a direct swap, not a re-dispatch — the
            // incoming task keeps whatever duration/priority made it win
            // the comparison, it does not get `on_dispatch`'s reset.
            let new_running = self.ready.pop_head().expect("head checked Some above");
            self.running = Some(new_running);
        }
    }

    /// Step 4. Returns true if a task finished and was moved to the ledger
    /// — the caller re-enters step 2 exactly once more when this happens.
    fn maybe_finalize(&mut self, policy: &dyn Policy, t: u64) -> bool {
        let complete = matches!(&self.running, Some(task) if task.is_complete());
        if !complete {
            return false;
        }
        let finished = self.running.take().expect("checked complete above");
        let record = CompletedTask::finalize(&finished, t);
        tracing::debug!(id = %record.id, finish = t, "scheduler: task completed");
        self.stats.record_completion(record);
        if matches!(policy.code(), PolicyKind::Priod) {
            self.admission_occurred_this_tick = true;
        }
        true
    }

    fn execute_one(&mut self) {
        if let Some(task) = &mut self.running {
            assert!(
                task.duration_remaining > 0,
                "invariant violation: dispatched task {} with duration_remaining == 0",
                task.id
            );
            self.stats.record_tick(&task.id);
            task.duration_remaining -= 1;
            if task.quantum_left > 0 {
                task.quantum_left -= 1;
            }
        }
    }

    /// The per-tick algorithm, steps 2 through 6. Step 1 (draining
    /// admissions) has no counterpart here: in this message-driven
    /// architecture every `NewTask` is admitted as it streams in, and the
    /// ordering guarantee (all of tick T's admissions precede the Tick(T)
    /// message) means the ready queue already reflects T's arrivals by the
    /// time this runs — equivalent to batching them at the top of the tick.
    pub fn process_tick(&mut self, policy: &dyn Policy, t: u64) {
        self.dispatch_or_preempt(policy);
        if self.maybe_finalize(policy, t) {
            self.dispatch_or_preempt(policy);
        }
        self.execute_one();
        policy.on_aging(&mut self.ready);
        self.admission_occurred_this_tick = false;
    }

    pub fn is_terminated(&self) -> bool {
        self.tasks_done && self.ready.is_empty() && self.running.is_none()
    }
}

pub fn run(
    config: &SimConfig,
    inbox: Receiver<SchedulerMsg>,
    to_clock: Sender<ClockMsg>,
    to_emitter: Sender<EmitterMsg>,
    interrupted: Arc<AtomicBool>,
) -> Result<StatsWriter, SimError> {
    let policy = config.policy.build(config.quantum);
    let mut state = SchedulerState::new();
    let mut was_interrupted = false;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            tracing::warn!("scheduler interrupted, tearing down without writing statistics");
            was_interrupted = true;
            break;
        }
        match inbox.recv_timeout(config.poll_timeout) {
            Ok(SchedulerMsg::NewTask(task)) => state.admit(policy.as_ref(), task),
            Ok(SchedulerMsg::TasksDone) => {
                state.tasks_done = true;
                if state.is_terminated() {
                    break;
                }
            }
            Ok(SchedulerMsg::Tick(t)) => {
                state.process_tick(policy.as_ref(), t);
                if state.is_terminated() {
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                tracing::warn!("scheduler: inbox disconnected before drain completed");
                break;
            }
        }
    }

    if !was_interrupted {
        state.stats.write_to(&config.output_dir, config.policy.as_str())?;
    }
    let _ = to_clock.send(ClockMsg::Shutdown);
    let _ = to_emitter.send(EmitterMsg::SchedulerDone);
    Ok(state.stats)
}
