//! Applies role deltas to guild members.

use std::sync::Arc;

use warbot_core::roles::RoleDelta;
use warbot_guild::{GuildError, GuildService, Member};

/// What an [`MutationApplier::apply`] call actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub added: usize,
    pub removed: usize,
}

impl Applied {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Turns [`RoleDelta`]s into guild role mutations.
///
/// Deltas are re-checked against the member's current roles first, so
/// satisfied additions and removals never reach the guild service.
pub struct MutationApplier {
    guild: Arc<dyn GuildService>,
}

impl MutationApplier {
    pub fn new(guild: Arc<dyn GuildService>) -> Self {
        Self { guild }
    }

    /// Apply `delta` to `member`: additions first, then removals.
    ///
    /// Stops at the first failing call. An error leaves the member partially
    /// updated; the caller decides whether to retry on a later tick.
    pub async fn apply(&self, member: &Member, delta: &RoleDelta) -> Result<Applied, GuildError> {
        let delta = delta.restrict_to(&member.roles);

        if !delta.add.is_empty() {
            self.guild
                .add_roles(member.id, &delta.add, delta.add_reason)
                .await?;
        }
        if !delta.remove.is_empty() {
            self.guild
                .remove_roles(member.id, &delta.remove, delta.remove_reason)
                .await?;
        }

        let applied = Applied {
            added: delta.add.len(),
            removed: delta.remove.len(),
        };

        if !applied.is_noop() {
            tracing::info!(
                member_id = member.id,
                display_name = %member.display_name,
                added = ?delta.add,
                removed = ?delta.remove,
                "Updated member roles"
            );
        }

        Ok(applied)
    }
}
