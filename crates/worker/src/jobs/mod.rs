//! The four reconciliation jobs.
//!
//! Each job is constructed once at startup and owned by its scheduler task.
//! Member jobs enumerate citizens, resolve them to game accounts through
//! the shared [`UserResolver`](warbot_gameapi::UserResolver) and isolate
//! failures per member.

pub mod military_unit_roles;
pub mod skill_roles;
pub mod takeover_countries;
pub mod unidentified_members;

pub use military_unit_roles::MilitaryUnitRolesJob;
pub use skill_roles::SkillRolesJob;
pub use takeover_countries::TakeoverCountriesJob;
pub use unidentified_members::UnidentifiedMembersJob;
