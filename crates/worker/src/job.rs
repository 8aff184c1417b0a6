//! The [`Job`] trait implemented by every reconciliation loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use warbot_gameapi::GameApiError;
use warbot_guild::GuildError;

/// Errors that abort a whole tick.
///
/// Per-entity failures never surface here; jobs count them in
/// [`TickSummary::failed`] and move on to the next entity.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Game API: {0}")]
    Game(#[from] GameApiError),

    #[error("Guild: {0}")]
    Guild(#[from] GuildError),

    /// Shutdown was requested mid-tick.
    #[error("Tick cancelled")]
    Cancelled,
}

/// Counters describing one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Entities (members or countries) looked at.
    pub examined: usize,
    /// Entities left alone: unresolved, unchanged, no data.
    pub skipped: usize,
    /// Entities whose roles were changed.
    pub mutated: usize,
    /// Entities whose processing failed.
    pub failed: usize,
    /// Items included in a posted report.
    pub reported: usize,
}

/// A periodic reconciliation loop.
///
/// The scheduler owns the job and calls [`tick`](Job::tick) once per
/// [`period`](Job::period); ticks of one job never overlap, so `&mut self`
/// state needs no locking.
#[async_trait]
pub trait Job: Send + 'static {
    fn name(&self) -> &'static str;

    fn period(&self) -> Duration;

    /// Run one tick. Implementations check `cancel` before every external
    /// call and return [`JobError::Cancelled`] once it fires.
    async fn tick(&mut self, cancel: &CancellationToken) -> Result<TickSummary, JobError>;
}

/// `Err(Cancelled)` once shutdown was requested.
pub fn ensure_active(cancel: &CancellationToken) -> Result<(), JobError> {
    if cancel.is_cancelled() {
        Err(JobError::Cancelled)
    } else {
        Ok(())
    }
}
