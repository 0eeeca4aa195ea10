//! Task domain model.
//!
//! A task is generated for a subject, targets their weakest attribute, and is
//! immutable after creation. Resolution happens on its submission, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::attributes::Attribute;

/// Category of a generated task. Completing a `Daily` task suppresses that
/// day's attribute decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Daily,
    Weekly,
    Special,
}

impl Default for TaskKind {
    fn default() -> Self {
        Self::Daily
    }
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Special => "special",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "special" => Some(Self::Special),
            _ => None,
        }
    }
}

/// Task difficulty. Carries every fixed per-difficulty table in the system:
/// the reward multiplier, the fallback XP used when the judge oracle is
/// unavailable, and the miss weight feeding the penalty severity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "extreme" => Some(Self::Extreme),
            _ => None,
        }
    }

    /// Reward multiplier applied to the base XP roll.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.5,
            Self::Extreme => 4.0,
        }
    }

    /// Fixed XP granted by the deterministic fallback verdict.
    pub fn fallback_xp(&self) -> i64 {
        match self {
            Self::Easy => 20,
            Self::Medium => 50,
            Self::Hard => 100,
            Self::Extreme => 200,
        }
    }

    /// Weight of one missed task of this difficulty in the PSI sum.
    pub fn miss_weight(&self) -> i64 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Extreme => 4,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated real-world task for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub kind: TaskKind,
    pub difficulty: Difficulty,
    pub description: String,
    pub target_attribute: Attribute,
    pub xp_reward: i64,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        subject_id: Uuid,
        kind: TaskKind,
        difficulty: Difficulty,
        description: impl Into<String>,
        target_attribute: Attribute,
        xp_reward: i64,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            kind,
            difficulty,
            description: description.into(),
            target_attribute,
            xp_reward,
            deadline,
            created_at: Utc::now(),
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }
}
