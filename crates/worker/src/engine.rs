//! Reconciliation engine: builds the four jobs and owns their tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use warbot_core::error::CoreError;
use warbot_gameapi::UserResolver;
use warbot_guild::GuildService;

use crate::config::{GuildConfig, JobIntervals};
use crate::jobs::{
    MilitaryUnitRolesJob, SkillRolesJob, TakeoverCountriesJob, UnidentifiedMembersJob,
};
use crate::scheduler;

/// Running job tasks plus the master cancellation token.
pub struct Engine {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    cancel: CancellationToken,
}

impl Engine {
    /// Build every job and spawn it on its own task.
    pub fn start(
        guild_config: &GuildConfig,
        intervals: JobIntervals,
        resolver: Arc<UserResolver>,
        guild: Arc<dyn GuildService>,
    ) -> Result<Self, CoreError> {
        let units = guild_config.military_unit_roles()?;
        let citizen = guild_config.roles.citizen;
        let reports = guild_config.channels.reports;
        let cancel = CancellationToken::new();

        let tasks = vec![
            (
                "skill_roles",
                scheduler::spawn(
                    SkillRolesJob::new(
                        Arc::clone(&resolver),
                        Arc::clone(&guild),
                        citizen,
                        guild_config.skill_roles(),
                        intervals.skill_roles,
                    ),
                    cancel.child_token(),
                ),
            ),
            (
                "military_unit_roles",
                scheduler::spawn(
                    MilitaryUnitRolesJob::new(
                        Arc::clone(&resolver),
                        Arc::clone(&guild),
                        citizen,
                        units,
                        intervals.military_unit_roles,
                    ),
                    cancel.child_token(),
                ),
            ),
            (
                "unidentified_members",
                scheduler::spawn(
                    UnidentifiedMembersJob::new(
                        Arc::clone(&resolver),
                        Arc::clone(&guild),
                        citizen,
                        reports,
                        intervals.unidentified_members,
                    ),
                    cancel.child_token(),
                ),
            ),
            (
                "takeover_countries",
                scheduler::spawn(
                    TakeoverCountriesJob::new(
                        Arc::clone(resolver.api()),
                        guild,
                        reports,
                        guild_config.active_countries.iter().cloned(),
                        intervals.takeover_countries,
                    ),
                    cancel.child_token(),
                ),
            ),
        ];

        tracing::info!(jobs = tasks.len(), "Reconciliation engine started");
        Ok(Self { tasks, cancel })
    }

    /// Stop scheduling ticks and wait up to `timeout` per job for its task
    /// to exit. A tick still running after that is abandoned.
    pub async fn shutdown(self, timeout: Duration) {
        tracing::info!("Shutting down reconciliation engine");
        self.cancel.cancel();

        for (name, handle) in self.tasks {
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(())) => tracing::info!(job = name, "Job stopped"),
                Ok(Err(e)) => tracing::error!(job = name, error = %e, "Job task panicked"),
                Err(_) => tracing::warn!(job = name, "Job did not stop in time"),
            }
        }

        tracing::info!("Reconciliation engine shut down complete");
    }
}
