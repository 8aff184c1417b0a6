//! Change-detection cache for skill classifications.
//!
//! Remembers the last classification whose roles were successfully applied
//! to each member, so unchanged members cost no role mutation. The cache
//! is memory-only: after a restart every member is re-evaluated once.

use std::collections::HashMap;

use warbot_core::classification::Classification;
use warbot_core::types::MemberId;

/// Last applied classification per member. Unbounded; the population is
/// bounded by the guild size.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: HashMap<MemberId, Classification>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, member: MemberId) -> Option<Classification> {
        self.entries.get(&member).copied()
    }

    pub fn set(&mut self, member: MemberId, classification: Classification) {
        self.entries.insert(member, classification);
    }

    /// `true` when `classification` is already applied to `member`.
    pub fn is_current(&self, member: MemberId, classification: Classification) -> bool {
        self.get(member) == Some(classification)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
