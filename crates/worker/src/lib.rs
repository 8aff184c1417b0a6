//! `warbot-worker` library crate.
//!
//! The reconciliation engine: configuration, the change-detection cache,
//! the mutation applier, the periodic scheduler and the four jobs. The
//! binary entrypoint lives in `main.rs`.

pub mod applier;
pub mod cache;
pub mod config;
pub mod engine;
pub mod job;
pub mod jobs;
pub mod scheduler;
