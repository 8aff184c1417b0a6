//! Domain logic for the WarEra guild bot.
//!
//! Everything in this crate is pure: no I/O, no async, no internal
//! dependencies. The reconciliation jobs in `warbot-worker` feed it data
//! fetched from the game API and the guild, and turn its output into
//! role mutations and reports.

pub mod classification;
pub mod error;
pub mod report;
pub mod roles;
pub mod types;
