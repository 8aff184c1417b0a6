//! Typed payloads of the WarEra tRPC endpoints.
//!
//! Only the fields the bot reads are declared. Unknown fields are ignored,
//! except on [`Government`] where the raw key set is part of the vacancy
//! heuristic.

use std::collections::BTreeMap;

use serde::Deserialize;
use warbot_core::classification::SkillBreakdown;

/// tRPC response envelope: `{"result": {"data": ...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: EnvelopeResult<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeResult<T> {
    pub data: Option<T>,
}

/// Response of `search.searchAnything`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub has_data: bool,
    /// Candidate user ids, best match first.
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// A single skill of a player.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Skill {
    pub level: u64,
}

/// Skill-point totals of a player.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leveling {
    pub total_skill_points: u64,
    pub available_skill_points: u64,
}

/// Response of `user.getUserLite`.
#[derive(Debug, Clone, Deserialize)]
pub struct GameUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub skills: BTreeMap<String, Skill>,
    pub leveling: Leveling,
    /// Id of the military unit the player belongs to, if any.
    #[serde(rename = "mu", default)]
    pub military_unit_id: Option<String>,
}

impl GameUser {
    /// Skill points split into economy and fight sides.
    pub fn skill_breakdown(&self) -> SkillBreakdown {
        SkillBreakdown::from_levels(
            self.skills.iter().map(|(name, skill)| (name.as_str(), skill.level)),
            self.leveling.available_skill_points,
            self.leveling.total_skill_points,
        )
    }
}

/// One entry of `country.getAllCountries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Number of keys in the government record of a country nobody governs:
/// `_id`, `country`, `__v` and `congressMembers`.
pub const VACANT_GOVERNMENT_KEYS: usize = 4;

/// Response of `government.getByCountryId`.
#[derive(Debug, Clone, Deserialize)]
pub struct Government {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "congressMembers")]
    pub congress_members: Vec<serde_json::Value>,
    /// Every other top-level key, verbatim.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Government {
    /// Number of top-level keys in the raw record.
    pub fn key_count(&self) -> usize {
        2 + self.other.len()
    }

    /// `true` when the record carries nothing beyond identity and version
    /// and nobody sits in congress: the country can be taken over.
    pub fn is_vacant(&self) -> bool {
        self.key_count() == VACANT_GOVERNMENT_KEYS && self.congress_members.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
