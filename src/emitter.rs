//! The Emitter: loads the manifest once, then on each tick hands off every
//! task whose arrival equals that tick to the Scheduler, preserving
//! manifest order among same-tick ties. Sends `TasksDone` once the
//! manifest is exhausted and terminates on `SchedulerDone`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::config::SimConfig;
use crate::error::ManifestError;
use crate::manifest::load_manifest;
use crate::messages::{EmitterMsg, SchedulerMsg};
use crate::task::Task;

pub fn run(
    manifest_path: &Path,
    config: &SimConfig,
    inbox: Receiver<EmitterMsg>,
    to_scheduler: Sender<SchedulerMsg>,
    interrupted: Arc<AtomicBool>,
) -> Result<(), ManifestError> {
    let mut pending: BTreeMap<u64, Vec<Task>> = load_manifest(manifest_path)?;
    let mut last_seen_tick: Option<u64> = None;
    let mut tasks_done_sent = false;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            tracing::warn!("emitter interrupted, tearing down");
            break;
        }
        match inbox.recv_timeout(config.poll_timeout) {
            Ok(EmitterMsg::SchedulerDone) => {
                tracing::debug!("emitter: scheduler done, terminating");
                break;
            }
            Ok(EmitterMsg::Tick(t)) => {
                if last_seen_tick != Some(t) {
                    if let Some(arrivals) = pending.remove(&t) {
                        for task in arrivals {
                            tracing::debug!(id = %task.id, arrival = t, "emitter: admitting task");
                            if to_scheduler.send(SchedulerMsg::NewTask(task)).is_err() {
                                tracing::warn!("emitter: scheduler channel closed, stopping");
                                return Ok(());
                            }
                        }
                    }
                    if pending.is_empty() && !tasks_done_sent {
                        std::thread::sleep(config.intra_tick_delay / 2);
                        if to_scheduler.send(SchedulerMsg::TasksDone).is_err() {
                            tracing::warn!("emitter: scheduler channel closed before TASKS_DONE");
                            return Ok(());
                        }
                        tasks_done_sent = true;
                    }
                    last_seen_tick = Some(t);
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                tracing::warn!("emitter: inbox disconnected, stopping");
                break;
            }
        }
    }
    Ok(())
}
