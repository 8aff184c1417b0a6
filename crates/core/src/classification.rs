//! Economy / fighter classification of a player's skill build.
//!
//! Each skill level `n` costs `triangular(n)` skill points in total, so a
//! build is weighed by points actually invested rather than raw levels.
//! Unspent points count toward the economy side: a player saving points is
//! not (yet) a fighter.

use serde::{Deserialize, Serialize};

/// Skills that count toward the economy side of a build.
pub const ECONOMY_SKILLS: [&str; 4] = ["energy", "companies", "entrepreneurship", "production"];

/// Economy share (percent) that must be strictly exceeded to classify as economy.
pub const ECONOMY_THRESHOLD_PCT: u64 = 50;

/// Derived role classification of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Economy,
    Fighter,
}

impl Classification {
    /// The other classification.
    pub fn opposite(self) -> Self {
        match self {
            Classification::Economy => Classification::Fighter,
            Classification::Fighter => Classification::Economy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Economy => "economy",
            Classification::Fighter => "fighter",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `n * (n + 1) / 2`: total skill points spent to reach level `n`.
///
/// `None` when the result does not fit in a `u64`.
pub fn triangular(n: u64) -> Option<u64> {
    // halve the even factor first so only the final product can overflow
    if n % 2 == 0 {
        (n / 2).checked_mul(n.checked_add(1)?)
    } else {
        n.checked_mul(n / 2 + 1)
    }
}

/// Skill points of a player split by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillBreakdown {
    /// Points invested in [`ECONOMY_SKILLS`].
    pub economy_points: u64,
    /// Points invested in every other skill. Not part of the decision;
    /// kept for logging.
    pub fight_points: u64,
    /// Points earned but not spent yet.
    pub available_points: u64,
    /// All points ever earned, as reported by the game.
    pub total_points: u64,
    /// A level too large to count was seen; point sums are saturated and
    /// the build cannot be classified.
    pub overflowed: bool,
}

impl SkillBreakdown {
    /// Build a breakdown from `(skill name, level)` pairs.
    pub fn from_levels<'a, I>(levels: I, available_points: u64, total_points: u64) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut breakdown = Self {
            available_points,
            total_points,
            ..Self::default()
        };

        for (skill, level) in levels {
            if level == 0 {
                continue;
            }
            let side = if ECONOMY_SKILLS.contains(&skill) {
                &mut breakdown.economy_points
            } else {
                &mut breakdown.fight_points
            };
            match triangular(level).and_then(|points| side.checked_add(points)) {
                Some(sum) => *side = sum,
                None => {
                    *side = u64::MAX;
                    breakdown.overflowed = true;
                }
            }
        }

        breakdown
    }

    /// Economy share of all earned points, in percent.
    ///
    /// `None` when the player has no points at all or the sums overflowed.
    pub fn economy_percentage(&self) -> Option<f64> {
        if self.total_points == 0 || self.overflowed {
            return None;
        }
        let economy = self.economy_points as f64 + self.available_points as f64;
        Some(economy / self.total_points as f64 * 100.0)
    }

    /// Classify the build, or `None` when `total_points` is zero or the
    /// point sums overflowed.
    ///
    /// The comparison runs on integers so that a build sitting exactly on
    /// the threshold is always a fighter. It is widened to `u128`, where
    /// no `u64` input can overflow it.
    pub fn classify(&self) -> Option<Classification> {
        if self.total_points == 0 || self.overflowed {
            return None;
        }
        let economy = u128::from(self.economy_points) + u128::from(self.available_points);
        let total = u128::from(self.total_points);
        if economy * 100 > u128::from(ECONOMY_THRESHOLD_PCT) * total {
            Some(Classification::Economy)
        } else {
            Some(Classification::Fighter)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
