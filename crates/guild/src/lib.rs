//! Guild membership and report channel integration.
//!
//! - [`GuildService`] — the collaborator interface the reconciliation jobs
//!   use to read members, mutate roles and post reports.
//! - [`DiscordGuild`] — implementation over the Discord REST API.
//! - [`embed`] — rendering of [`Report`](warbot_core::report::Report)s as
//!   Discord embeds.

pub mod discord;
pub mod embed;
pub mod service;

pub use discord::DiscordGuild;
pub use service::{GuildError, GuildService, Member};
