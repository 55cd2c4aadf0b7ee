use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::unbounded;

use cpu_sim::{clock, emitter, scheduler, PolicyKind, SimConfig};

/// Discrete-time CPU scheduling simulator.
///
/// Reads a manifest of tasks, runs one of seven dispatch policies over a
/// tick-driven event loop, and writes a per-tick execution trace plus
/// turnaround/waiting statistics to `<output-dir>/<policy>.txt`.
#[derive(Parser, Debug)]
#[command(name = "cpu-sim", version, about)]
struct Cli {
    /// Path to the task manifest (one task per line: id;arrival;duration;priority).
    #[arg(long)]
    manifest: PathBuf,

    /// Scheduling policy to run.
    #[arg(long, value_enum)]
    policy: PolicyKind,

    /// Round Robin quantum, in ticks. Ignored by every other policy.
    #[arg(long, default_value_t = 3)]
    quantum: u32,

    /// Directory the statistics file is written into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = SimConfig::new(cli.policy, cli.quantum, cli.output_dir.clone());

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || {
            tracing::warn!("interrupt received, shutting down at the next poll");
            interrupted.store(true, Ordering::SeqCst);
        })
        .context("failed to install Ctrl-C handler")?;
    }

    // Single inbound queue per component (spec §5): every sender that
    // addresses a component shares that component's one receiver.
    let (emitter_tx, emitter_rx) = unbounded();
    let (scheduler_tx, scheduler_rx) = unbounded();
    let (clock_shutdown_tx, clock_shutdown_rx) = unbounded();

    let clock_handle = {
        let config = config.clone();
        let emitter_tx = emitter_tx.clone();
        let scheduler_tx = scheduler_tx.clone();
        let interrupted = interrupted.clone();
        std::thread::Builder::new()
            .name("clock".into())
            .spawn(move || {
                clock::run(&config, emitter_tx, scheduler_tx, clock_shutdown_rx, interrupted)
            })
            .context("failed to spawn clock thread")?
    };

    let emitter_handle = {
        let config = config.clone();
        let manifest = cli.manifest.clone();
        let scheduler_tx = scheduler_tx.clone();
        let interrupted = interrupted.clone();
        std::thread::Builder::new()
            .name("emitter".into())
            .spawn(move || emitter::run(&manifest, &config, emitter_rx, scheduler_tx, interrupted))
            .context("failed to spawn emitter thread")?
    };

    let scheduler_handle = {
        let config = config.clone();
        std::thread::Builder::new()
            .name("scheduler".into())
            .spawn(move || {
                scheduler::run(&config, scheduler_rx, clock_shutdown_tx, emitter_tx, interrupted)
            })
            .context("failed to spawn scheduler thread")?
    };

    clock_handle.join().expect("clock thread panicked");
    emitter_handle
        .join()
        .expect("emitter thread panicked")
        .context("emitter failed to load manifest")?;
    let stats = scheduler_handle
        .join()
        .expect("scheduler thread panicked")
        .context("scheduler failed")?;

    let path = cpu_sim::StatsWriter::output_path(&config.output_dir, cli.policy.as_str());
    println!(
        "wrote {} completed task record(s) to {}",
        stats.completed().len(),
        path.display()
    );
    Ok(())
}
