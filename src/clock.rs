//! The Clock: publishes a monotonically increasing tick to the Emitter,
//! waits a short intra-tick delay, then publishes the same tick to the
//! Scheduler. That two-phase publish is the core synchronization idea of
//! the whole simulator (spec §4.1, §9) — it guarantees the Scheduler never
//! sees tick T before the Emitter has had a chance to admit T's arrivals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{select, Receiver, Sender};

use crate::config::SimConfig;
use crate::messages::{ClockMsg, EmitterMsg, SchedulerMsg};

pub fn run(
    config: &SimConfig,
    to_emitter: Sender<EmitterMsg>,
    to_scheduler: Sender<SchedulerMsg>,
    shutdown: Receiver<ClockMsg>,
    interrupted: Arc<AtomicBool>,
) {
    let mut t: u64 = 0;
    loop {
        if interrupted.load(Ordering::SeqCst) {
            tracing::warn!("clock interrupted, tearing down");
            break;
        }

        if to_emitter.send(EmitterMsg::Tick(t)).is_err() {
            tracing::warn!(tick = t, "clock: emitter channel closed, stopping");
            break;
        }

        // Wait for either the intra-tick delay to elapse or a shutdown to
        // arrive — whichever happens first. This is the "wait δ" step of
        // spec §4.1, made interruptible.
        select! {
            recv(shutdown) -> msg => {
                if matches!(msg, Ok(ClockMsg::Shutdown) | Err(_)) {
                    tracing::debug!("clock: shutdown received during intra-tick delay");
                    break;
                }
            }
            default(config.intra_tick_delay) => {}
        }

        if to_scheduler.send(SchedulerMsg::Tick(t)).is_err() {
            tracing::warn!(tick = t, "clock: scheduler channel closed, stopping");
            break;
        }
        t += 1;

        select! {
            recv(shutdown) -> msg => {
                if matches!(msg, Ok(ClockMsg::Shutdown) | Err(_)) {
                    tracing::debug!("clock: shutdown received");
                    break;
                }
            }
            default(config.period) => {}
        }
    }
}
