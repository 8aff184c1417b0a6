//! The [`GuildService`] collaborator interface.

use std::collections::BTreeSet;

use async_trait::async_trait;
use warbot_core::report::Report;
use warbot_core::types::{ChannelId, MemberId, RoleId};

/// A guild member as seen at the start of a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    /// Name shown in the guild: nickname, else global name, else username.
    pub display_name: String,
    pub roles: BTreeSet<RoleId>,
}

impl Member {
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}

/// Errors from the guild service layer.
#[derive(Debug, thiserror::Error)]
pub enum GuildError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Guild API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The service rejected the call with 429. Not retried; the entity is
    /// picked up again on a later tick.
    #[error("Rate limited (retry after {retry_after_secs:?}s): {body}")]
    RateLimited {
        /// Value of the `Retry-After` header, when present and numeric.
        retry_after_secs: Option<f64>,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected guild payload: {0}")]
    Decode(String),
}

/// Group-membership service and report channel.
///
/// Role mutations must tolerate already-satisfied state: adding a held role
/// or removing a missing one is a successful no-op.
#[async_trait]
pub trait GuildService: Send + Sync {
    /// Every member holding `role`, in the order the service lists them.
    async fn members_with_role(&self, role: RoleId) -> Result<Vec<Member>, GuildError>;

    /// Add `roles` to a member, recording `reason` in the audit log.
    async fn add_roles(
        &self,
        member: MemberId,
        roles: &[RoleId],
        reason: &str,
    ) -> Result<(), GuildError>;

    /// Remove `roles` from a member, recording `reason` in the audit log.
    async fn remove_roles(
        &self,
        member: MemberId,
        roles: &[RoleId],
        reason: &str,
    ) -> Result<(), GuildError>;

    /// Post a report to a channel.
    async fn post_report(&self, channel: ChannelId, report: &Report) -> Result<(), GuildError>;
}
