//! [`GuildService`] over the Discord REST API (v10).
//!
//! Only REST is used: members are listed page by page, roles are mutated one
//! at a time with the audit-log reason header, and reports are posted as one
//! message per embed. The gateway connection is not needed for any of this.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::Deserialize;
use warbot_core::report::Report;
use warbot_core::types::{snowflake, ChannelId, GuildId, MemberId, RoleId, Snowflake};

use crate::embed::{Embed, MessageBody};
use crate::service::{GuildError, GuildService, Member};

/// Default base URL of the Discord REST API.
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Page size of the member listing endpoint (Discord maximum).
const MEMBER_PAGE_SIZE: usize = 1000;

const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

const RETRY_AFTER: &str = "Retry-After";

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(with = "snowflake")]
    id: Snowflake,
    username: String,
    #[serde(default)]
    global_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMember {
    user: WireUser,
    #[serde(default)]
    nick: Option<String>,
    #[serde(deserialize_with = "snowflake::vec::deserialize")]
    roles: Vec<Snowflake>,
}

impl From<WireMember> for Member {
    fn from(wire: WireMember) -> Self {
        let display_name = wire
            .nick
            .or(wire.user.global_name)
            .unwrap_or(wire.user.username);
        Member {
            id: wire.user.id,
            display_name,
            roles: wire.roles.into_iter().collect::<BTreeSet<_>>(),
        }
    }
}

/// Discord REST client bound to one guild.
pub struct DiscordGuild {
    client: reqwest::Client,
    api_url: String,
    token: String,
    guild_id: GuildId,
}

impl DiscordGuild {
    /// Create a client with its own connection pool and a per-request
    /// timeout.
    pub fn new(
        api_url: String,
        token: String,
        guild_id: GuildId,
        timeout: Duration,
    ) -> Result<Self, GuildError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            guild_id,
        })
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GuildError> {
        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(status_error(status.as_u16(), retry_after.as_deref(), body));
        }
        Ok(response)
    }

    async fn member_page(&self, after: Snowflake) -> Result<Vec<WireMember>, GuildError> {
        let response = self
            .request(Method::GET, &format!("/guilds/{}/members", self.guild_id))
            .query(&[
                ("limit", MEMBER_PAGE_SIZE.to_string()),
                ("after", after.to_string()),
            ])
            .send()
            .await?;
        let body = Self::ensure_success(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| GuildError::Decode(e.to_string()))
    }

    async fn mutate_role(
        &self,
        method: Method,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> Result<(), GuildError> {
        let path = format!("/guilds/{}/members/{}/roles/{}", self.guild_id, member, role);
        let response = self
            .request(method, &path)
            .header(AUDIT_LOG_REASON, reason)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Map a non-2xx response to a [`GuildError`].
///
/// 429 gets its own variant and a warning so throttled ticks stand out in
/// the logs; the call is not retried.
fn status_error(status: u16, retry_after: Option<&str>, body: String) -> GuildError {
    if status == 429 {
        let retry_after_secs = retry_after.and_then(|v| v.trim().parse::<f64>().ok());
        tracing::warn!(retry_after_secs, "Discord rate limit hit");
        return GuildError::RateLimited {
            retry_after_secs,
            body,
        };
    }
    GuildError::ApiError { status, body }
}

/// `after` cursor over the member listing.
///
/// Starts at 0 and follows the last id of each page; a page shorter than
/// [`MEMBER_PAGE_SIZE`] is the last one.
#[derive(Debug, Default)]
struct PageCursor {
    after: Snowflake,
    done: bool,
}

impl PageCursor {
    fn next_after(&self) -> Option<Snowflake> {
        (!self.done).then_some(self.after)
    }

    fn advance(&mut self, page: &[WireMember]) {
        if let Some(last) = page.last() {
            self.after = last.user.id;
        }
        if page.len() < MEMBER_PAGE_SIZE {
            self.done = true;
        }
    }
}

#[async_trait]
impl GuildService for DiscordGuild {
    async fn members_with_role(&self, role: RoleId) -> Result<Vec<Member>, GuildError> {
        let mut members = Vec::new();
        let mut cursor = PageCursor::default();

        while let Some(after) = cursor.next_after() {
            let page = self.member_page(after).await?;
            cursor.advance(&page);

            members.extend(
                page.into_iter()
                    .map(Member::from)
                    .filter(|m| m.has_role(role)),
            );
        }

        tracing::debug!(guild_id = self.guild_id, role, count = members.len(), "Listed members");
        Ok(members)
    }

    async fn add_roles(
        &self,
        member: MemberId,
        roles: &[RoleId],
        reason: &str,
    ) -> Result<(), GuildError> {
        for role in roles {
            self.mutate_role(Method::PUT, member, *role, reason).await?;
        }
        Ok(())
    }

    async fn remove_roles(
        &self,
        member: MemberId,
        roles: &[RoleId],
        reason: &str,
    ) -> Result<(), GuildError> {
        for role in roles {
            self.mutate_role(Method::DELETE, member, *role, reason).await?;
        }
        Ok(())
    }

    async fn post_report(&self, channel: ChannelId, report: &Report) -> Result<(), GuildError> {
        let embeds = Embed::from_report(report, Utc::now());
        let pages = embeds.len();

        for embed in embeds {
            let body = MessageBody {
                embeds: vec![embed],
            };
            let response = self
                .request(Method::POST, &format!("/channels/{channel}/messages"))
                .json(&body)
                .send()
                .await?;
            Self::ensure_success(response).await?;
        }

        tracing::debug!(channel, pages, total = report.total, "Posted report");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
