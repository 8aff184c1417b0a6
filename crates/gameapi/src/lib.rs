//! WarEra game API client.
//!
//! Provides typed payloads for the tRPC endpoints the bot consumes, the
//! [`GameApi`] collaborator trait, an HTTP implementation backed by
//! [`reqwest`], and the [`UserResolver`] that maps guild display names to
//! game accounts.

pub mod api;
pub mod resolver;
pub mod types;

pub use api::{GameApi, GameApiError, WarEraApi};
pub use resolver::UserResolver;
pub use types::{Country, GameUser, Government, Leveling, SearchResult, Skill};
