//! Report of countries whose government is vacant.
//!
//! The country list is fetched on the first tick and kept for the lifetime
//! of the process; new countries appear only after a restart. Governments
//! are fetched fresh every tick.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use warbot_core::report::Report;
use warbot_core::types::ChannelId;
use warbot_gameapi::{Country, GameApi};
use warbot_guild::GuildService;

use crate::job::{ensure_active, Job, JobError, TickSummary};

pub struct TakeoverCountriesJob {
    api: Arc<dyn GameApi>,
    guild: Arc<dyn GuildService>,
    report_channel: ChannelId,
    /// Country names or ids never reported.
    excluded: HashSet<String>,
    /// Empty until seeded by the first successful fetch.
    countries: Vec<Country>,
    period: Duration,
}

impl TakeoverCountriesJob {
    pub fn new(
        api: Arc<dyn GameApi>,
        guild: Arc<dyn GuildService>,
        report_channel: ChannelId,
        excluded: impl IntoIterator<Item = String>,
        period: Duration,
    ) -> Self {
        Self {
            api,
            guild,
            report_channel,
            excluded: excluded.into_iter().collect(),
            countries: Vec::new(),
            period,
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    fn is_excluded(&self, country: &Country) -> bool {
        self.excluded.contains(&country.name) || self.excluded.contains(&country.id)
    }
}

#[async_trait]
impl Job for TakeoverCountriesJob {
    fn name(&self) -> &'static str {
        "takeover_countries"
    }

    fn period(&self) -> Duration {
        self.period
    }

    async fn tick(&mut self, cancel: &CancellationToken) -> Result<TickSummary, JobError> {
        let mut summary = TickSummary::default();

        if self.countries.is_empty() {
            ensure_active(cancel)?;
            self.countries = self.api.list_countries().await?;
            tracing::info!(count = self.countries.len(), "Loaded country list");
        }

        let mut vacant: Vec<&Country> = Vec::new();
        for country in &self.countries {
            if self.is_excluded(country) {
                continue;
            }
            summary.examined += 1;

            ensure_active(cancel)?;
            match self.api.get_country_government(&country.id).await {
                Ok(Some(government)) if government.is_vacant() => vacant.push(country),
                Ok(_) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        country_id = %country.id,
                        country = %country.name,
                        error = %e,
                        "Government lookup failed"
                    );
                    summary.failed += 1;
                }
            }
        }

        if vacant.is_empty() {
            return Ok(summary);
        }

        let report = Report::takeover_countries(
            vacant.iter().map(|c| (c.name.as_str(), c.id.as_str())),
        );

        ensure_active(cancel)?;
        self.guild.post_report(self.report_channel, &report).await?;
        summary.reported = report.total;

        tracing::info!(count = report.total, "Posted takeover countries report");
        Ok(summary)
    }
}
