//! Military unit role sync.
//!
//! Gives every citizen the role of the military unit they belong to in game
//! and strips the roles of any other configured unit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use warbot_core::roles::MilitaryUnitRoles;
use warbot_core::types::RoleId;
use warbot_gameapi::UserResolver;
use warbot_guild::GuildService;

use crate::applier::MutationApplier;
use crate::job::{ensure_active, Job, JobError, TickSummary};

pub struct MilitaryUnitRolesJob {
    resolver: Arc<UserResolver>,
    guild: Arc<dyn GuildService>,
    applier: MutationApplier,
    citizen_role: RoleId,
    units: MilitaryUnitRoles,
    period: Duration,
}

impl MilitaryUnitRolesJob {
    pub fn new(
        resolver: Arc<UserResolver>,
        guild: Arc<dyn GuildService>,
        citizen_role: RoleId,
        units: MilitaryUnitRoles,
        period: Duration,
    ) -> Self {
        Self {
            resolver,
            applier: MutationApplier::new(Arc::clone(&guild)),
            guild,
            citizen_role,
            units,
            period,
        }
    }
}

#[async_trait]
impl Job for MilitaryUnitRolesJob {
    fn name(&self) -> &'static str {
        "military_unit_roles"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn tick(&mut self, cancel: &CancellationToken) -> Result<TickSummary, JobError> {
        let mut summary = TickSummary::default();

        if self.units.is_empty() {
            tracing::debug!("No military units configured");
            return Ok(summary);
        }

        ensure_active(cancel)?;
        let members = self.guild.members_with_role(self.citizen_role).await?;

        for member in &members {
            summary.examined += 1;

            ensure_active(cancel)?;
            let user = match self.resolver.resolve(&member.display_name).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(member_id = member.id, error = %e, "Game account lookup failed");
                    summary.failed += 1;
                    continue;
                }
            };

            let Some(unit_id) = user.military_unit_id.as_deref() else {
                summary.skipped += 1;
                continue;
            };

            let Some(delta) = self.units.delta(unit_id, &member.roles) else {
                // unknown unit, or role already held
                summary.skipped += 1;
                continue;
            };

            ensure_active(cancel)?;
            match self.applier.apply(member, &delta).await {
                Ok(applied) if applied.is_noop() => summary.skipped += 1,
                Ok(_) => summary.mutated += 1,
                Err(e) => {
                    tracing::warn!(
                        member_id = member.id,
                        unit_id,
                        error = %e,
                        "Military unit role update failed"
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
