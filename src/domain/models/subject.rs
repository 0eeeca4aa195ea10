//! Subject domain model and the XP/rank/level resolution math.
//!
//! Rank and level are pure functions of the lifetime XP counter. Nothing else
//! feeds into them, and they are only ever recomputed together with a change
//! to `total_xp`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Macro reputation tier, derived from lifetime XP via a fixed interval table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    E,
    D,
    C,
    B,
    A,
    S,
    #[serde(rename = "ss")]
    Ss,
}

impl Default for Rank {
    fn default() -> Self {
        Self::E
    }
}

/// Lower XP bound of each rank, in ascending order. Upper bounds are implied
/// by the next entry; SS has no upper bound.
const RANK_THRESHOLDS: [(Rank, i64); 7] = [
    (Rank::E, 0),
    (Rank::D, 1_000),
    (Rank::C, 5_000),
    (Rank::B, 15_000),
    (Rank::A, 40_000),
    (Rank::S, 100_000),
    (Rank::Ss, 250_000),
];

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
            Self::Ss => "SS",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "E" => Some(Self::E),
            "D" => Some(Self::D),
            "C" => Some(Self::C),
            "B" => Some(Self::B),
            "A" => Some(Self::A),
            "S" => Some(Self::S),
            "SS" => Some(Self::Ss),
            _ => None,
        }
    }

    /// Resolve the rank for a lifetime XP total. Negative XP resolves to the
    /// lowest rank.
    pub fn for_xp(total_xp: i64) -> Self {
        let mut rank = Rank::E;
        for (candidate, floor) in RANK_THRESHOLDS {
            if total_xp >= floor {
                rank = candidate;
            }
        }
        rank
    }

    /// Inclusive lower XP bound of this rank.
    pub fn xp_floor(&self) -> i64 {
        RANK_THRESHOLDS
            .iter()
            .find(|(r, _)| r == self)
            .map(|(_, floor)| *floor)
            .unwrap_or(0)
    }

    /// Lower XP bound of the next rank up, if any. SS is unbounded.
    pub fn next_floor(&self) -> Option<i64> {
        let idx = RANK_THRESHOLDS.iter().position(|(r, _)| r == self)?;
        RANK_THRESHOLDS.get(idx + 1).map(|(_, floor)| *floor)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XP needed to reach a level: `round(100 * level^1.5)`, levels 1-indexed.
pub fn xp_required(level: i64) -> i64 {
    (100.0 * (level as f64).powf(1.5)).round() as i64
}

/// The largest level >= 1 whose XP requirement is met by `total_xp`, found by
/// forward search from level 1. Level never resets across rank boundaries.
pub fn calculate_level(total_xp: i64) -> i64 {
    let mut level = 1;
    while xp_required(level + 1) <= total_xp {
        level += 1;
    }
    level
}

/// Percentage progress toward the next rank boundary within the current rank.
/// SS has no upper bound and always reports 100%.
pub fn rank_progress(total_xp: i64) -> f64 {
    let rank = Rank::for_xp(total_xp);
    let Some(next) = rank.next_floor() else {
        return 100.0;
    };
    let floor = rank.xp_floor();
    let clamped = total_xp.max(floor);
    ((clamped - floor) as f64 / (next - floor) as f64 * 100.0).min(100.0)
}

/// The tracked individual whose real-world actions drive the simulation.
///
/// Created once; `rank`, `level`, and `total_xp` are mutated only by the
/// progression service, always together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub rank: Rank,
    pub level: i64,
    pub total_xp: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rank: Rank::E,
            level: 1,
            total_xp: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "subject name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_name() {
        assert!(Subject::new("runner").validate().is_ok());
        let blank = Subject::new("   ");
        assert!(matches!(
            blank.validate(),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(Rank::for_xp(999), Rank::E);
        assert_eq!(Rank::for_xp(1_000), Rank::D);
        assert_eq!(Rank::for_xp(4_999), Rank::D);
        assert_eq!(Rank::for_xp(5_000), Rank::C);
        assert_eq!(Rank::for_xp(249_999), Rank::S);
        assert_eq!(Rank::for_xp(250_000), Rank::Ss);
    }

    #[test]
    fn test_negative_xp_resolves_to_lowest_rank() {
        assert_eq!(Rank::for_xp(-500), Rank::E);
        assert_eq!(Rank::for_xp(i64::MIN), Rank::E);
    }

    #[test]
    fn test_xp_required_formula() {
        assert_eq!(xp_required(1), 100);
        assert_eq!(xp_required(5), 1_118);
        assert_eq!(xp_required(20), 8_944);
    }

    #[test]
    fn test_calculate_level() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(-50), 1);
        assert_eq!(calculate_level(99), 1);
        assert_eq!(calculate_level(1_118), 5);
        // Just below the level-5 requirement
        assert_eq!(calculate_level(1_117), 4);
        assert_eq!(calculate_level(8_944), 20);
    }

    #[test]
    fn test_level_monotonic_in_xp() {
        let mut last = 0;
        for xp in (0..20_000).step_by(97) {
            let level = calculate_level(xp);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn test_rank_progress() {
        // E spans [0, 1000); halfway at 500
        assert!((rank_progress(500) - 50.0).abs() < 1e-9);
        assert_eq!(rank_progress(0), 0.0);
        // SS always reports 100
        assert_eq!(rank_progress(250_000), 100.0);
        assert_eq!(rank_progress(9_000_000), 100.0);
        // Negative XP clamps to the rank floor
        assert_eq!(rank_progress(-100), 0.0);
    }

    #[test]
    fn test_rank_codec() {
        for xp in [0, 1_000, 5_000, 15_000, 40_000, 100_000, 250_000] {
            let rank = Rank::for_xp(xp);
            assert_eq!(Rank::from_str(rank.as_str()), Some(rank));
        }
        assert_eq!(Rank::from_str("ss"), Some(Rank::Ss));
        assert_eq!(Rank::from_str("Z"), None);
    }
}
