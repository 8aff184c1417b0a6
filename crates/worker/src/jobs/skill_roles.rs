//! Economy / fight role sync.
//!
//! Classifies every citizen's skill build and moves them onto the matching
//! role. The [`ClassificationCache`] suppresses members whose classification
//! has not changed since their roles were last applied.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use warbot_core::roles::SkillRoles;
use warbot_core::types::RoleId;
use warbot_gameapi::UserResolver;
use warbot_guild::GuildService;

use crate::applier::MutationApplier;
use crate::cache::ClassificationCache;
use crate::job::{ensure_active, Job, JobError, TickSummary};

pub struct SkillRolesJob {
    resolver: Arc<UserResolver>,
    guild: Arc<dyn GuildService>,
    applier: MutationApplier,
    citizen_role: RoleId,
    roles: SkillRoles,
    cache: ClassificationCache,
    period: Duration,
}

impl SkillRolesJob {
    pub fn new(
        resolver: Arc<UserResolver>,
        guild: Arc<dyn GuildService>,
        citizen_role: RoleId,
        roles: SkillRoles,
        period: Duration,
    ) -> Self {
        Self {
            resolver,
            applier: MutationApplier::new(Arc::clone(&guild)),
            guild,
            citizen_role,
            roles,
            cache: ClassificationCache::new(),
            period,
        }
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }
}

#[async_trait]
impl Job for SkillRolesJob {
    fn name(&self) -> &'static str {
        "skill_roles"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn tick(&mut self, cancel: &CancellationToken) -> Result<TickSummary, JobError> {
        let mut summary = TickSummary::default();

        ensure_active(cancel)?;
        let members = self.guild.members_with_role(self.citizen_role).await?;

        for member in &members {
            summary.examined += 1;

            ensure_active(cancel)?;
            let user = match self.resolver.resolve(&member.display_name).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    tracing::debug!(member_id = member.id, display_name = %member.display_name, "No game account");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(member_id = member.id, error = %e, "Game account lookup failed");
                    summary.failed += 1;
                    continue;
                }
            };

            let breakdown = user.skill_breakdown();
            let Some(classification) = breakdown.classify() else {
                tracing::warn!(
                    member_id = member.id,
                    user_id = %user.id,
                    total_points = breakdown.total_points,
                    overflowed = breakdown.overflowed,
                    "Skill data cannot be classified, skipping"
                );
                summary.skipped += 1;
                continue;
            };

            tracing::debug!(
                member_id = member.id,
                economy_points = breakdown.economy_points,
                fight_points = breakdown.fight_points,
                available_points = breakdown.available_points,
                total_points = breakdown.total_points,
                percentage = breakdown.economy_percentage().unwrap_or_default(),
                %classification,
                "Classified member"
            );

            if self.cache.is_current(member.id, classification) {
                summary.skipped += 1;
                continue;
            }

            let delta = self.roles.delta(classification, &member.roles);

            ensure_active(cancel)?;
            match self.applier.apply(member, &delta).await {
                Ok(applied) => {
                    // Only a confirmed mutation (or an already-correct member)
                    // is remembered; failures are retried next tick.
                    self.cache.set(member.id, classification);
                    if applied.is_noop() {
                        summary.skipped += 1;
                    } else {
                        summary.mutated += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(member_id = member.id, error = %e, "Role update failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
