//! Immutable, injected configuration. Per DESIGN NOTES §9, the "seeming
//! globals" of the source (host, ports, period) carry no process-wide
//! state of their own — they are just values threaded into whichever
//! component needs them.

use std::time::Duration;

use crate::policy::PolicyKind;

/// Default loopback ports from the original three-process deployment.
/// Unused by the collapsed single-process runtime (see DESIGN.md); kept as
/// named constants for protocol fidelity, not as live configuration.
pub const DEFAULT_CLOCK_PORT: u16 = 4000;
pub const DEFAULT_EMITTER_PORT: u16 = 4001;
pub const DEFAULT_SCHEDULER_PORT: u16 = 4002;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub policy: PolicyKind,
    pub quantum: u32,
    /// Wall-clock period between tick boundaries.
    pub period: Duration,
    /// Intra-tick delay between the Emitter's and the Scheduler's view of
    /// the same tick.
    pub intra_tick_delay: Duration,
    /// Poll timeout each component's inbound-queue recv uses so it can
    /// also observe interruption.
    pub poll_timeout: Duration,
    pub output_dir: std::path::PathBuf,
}

impl SimConfig {
    pub fn new(policy: PolicyKind, quantum: u32, output_dir: std::path::PathBuf) -> Self {
        Self {
            policy,
            quantum,
            period: Duration::from_millis(100),
            intra_tick_delay: Duration::from_millis(5),
            poll_timeout: Duration::from_millis(100),
            output_dir,
        }
    }

    /// Same simulation, sped up for tests: the observable ordering
    /// guarantees (Emitter before Scheduler, same tick) are unaffected by
    /// absolute timing, only by the *relative* ordering of sends.
    #[cfg(test)]
    pub fn for_tests(policy: PolicyKind, quantum: u32, output_dir: std::path::PathBuf) -> Self {
        Self {
            policy,
            quantum,
            period: Duration::from_millis(2),
            intra_tick_delay: Duration::from_micros(200),
            poll_timeout: Duration::from_millis(20),
            output_dir,
        }
    }
}
