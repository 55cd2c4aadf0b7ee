//! The only cross-task communication in the simulator: message passing
//! over single-inbound-queue channels, matching spec §5. Each component has
//! exactly one inbound message type, fed by every sender that talks to it.

use crate::task::Task;

/// Delivered to the Scheduler by both the Clock (`Tick`) and the Emitter
/// (`NewTask`, `TasksDone`) on one shared channel, so the Scheduler really
/// does have a single inbound queue with the ordering guarantees §5
/// describes.
#[derive(Debug)]
pub enum SchedulerMsg {
    Tick(u64),
    NewTask(Task),
    TasksDone,
}

/// Delivered to the Emitter by the Clock (`Tick`) and the Scheduler
/// (`SchedulerDone`).
#[derive(Debug)]
pub enum EmitterMsg {
    Tick(u64),
    SchedulerDone,
}

/// Delivered to the Clock by the Scheduler once it has drained and written
/// final statistics.
#[derive(Debug)]
pub enum ClockMsg {
    Shutdown,
}
