//! Fixed-period driver for [`Job`]s.
//!
//! Each job runs in its own task: tick immediately, then once per period.
//! A failed tick is logged and the next one is scheduled as usual. The loop
//! exits when the [`CancellationToken`] is triggered.

use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::job::{Job, JobError};

/// Run `job` until `cancel` is triggered.
pub async fn run<J: Job>(mut job: J, cancel: CancellationToken) {
    let name = job.name();
    let period = job.period();

    tracing::info!(job = name, period_secs = period.as_secs(), "Job started");

    let mut interval = tokio::time::interval(period);
    // A tick longer than the period delays the next one rather than
    // triggering a burst of catch-up ticks.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(job = name, "Job stopping");
                break;
            }
            _ = interval.tick() => {
                let started = Instant::now();
                match job.tick(&cancel).await {
                    Ok(summary) => {
                        tracing::info!(
                            job = name,
                            examined = summary.examined,
                            skipped = summary.skipped,
                            mutated = summary.mutated,
                            failed = summary.failed,
                            reported = summary.reported,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Tick finished"
                        );
                    }
                    Err(JobError::Cancelled) => {
                        tracing::info!(job = name, "Tick abandoned, job stopping");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(job = name, error = %e, "Tick failed");
                    }
                }
            }
        }
    }
}

/// Spawn [`run`] on the runtime.
pub fn spawn<J: Job>(job: J, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(run(job, cancel))
}
