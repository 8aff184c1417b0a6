//! Report of citizens whose display name matches no game account.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use warbot_core::report::Report;
use warbot_core::types::{ChannelId, RoleId};
use warbot_gameapi::UserResolver;
use warbot_guild::{GuildService, Member};

use crate::job::{ensure_active, Job, JobError, TickSummary};

pub struct UnidentifiedMembersJob {
    resolver: Arc<UserResolver>,
    guild: Arc<dyn GuildService>,
    citizen_role: RoleId,
    report_channel: ChannelId,
    period: Duration,
}

impl UnidentifiedMembersJob {
    pub fn new(
        resolver: Arc<UserResolver>,
        guild: Arc<dyn GuildService>,
        citizen_role: RoleId,
        report_channel: ChannelId,
        period: Duration,
    ) -> Self {
        Self {
            resolver,
            guild,
            citizen_role,
            report_channel,
            period,
        }
    }
}

#[async_trait]
impl Job for UnidentifiedMembersJob {
    fn name(&self) -> &'static str {
        "unidentified_members"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn tick(&mut self, cancel: &CancellationToken) -> Result<TickSummary, JobError> {
        let mut summary = TickSummary::default();

        ensure_active(cancel)?;
        let members = self.guild.members_with_role(self.citizen_role).await?;

        let mut seen = HashSet::new();
        let mut unidentified: Vec<&Member> = Vec::new();
        for member in &members {
            if !seen.insert(member.id) {
                continue;
            }
            summary.examined += 1;

            ensure_active(cancel)?;
            match self.resolver.resolve(&member.display_name).await {
                Ok(Some(_)) => {}
                Ok(None) => unidentified.push(member),
                Err(e) => {
                    // A lookup failure says nothing about the name; leave the
                    // member out of the report.
                    tracing::warn!(member_id = member.id, error = %e, "Game account lookup failed");
                    summary.failed += 1;
                }
            }
        }

        if unidentified.is_empty() {
            return Ok(summary);
        }

        let report = Report::unidentified_members(
            unidentified
                .iter()
                .map(|m| (m.id, m.display_name.as_str())),
        );

        ensure_active(cancel)?;
        self.guild.post_report(self.report_channel, &report).await?;
        summary.reported = report.total;

        tracing::info!(count = report.total, "Posted unidentified members report");
        Ok(summary)
    }
}
