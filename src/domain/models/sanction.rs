//! Sanction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a sanction was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanctionReason {
    MissedTask,
    XpLoss,
    RankLock,
}

impl SanctionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissedTask => "missed_task",
            Self::XpLoss => "xp_loss",
            Self::RankLock => "rank_lock",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "missed_task" => Some(Self::MissedTask),
            "xp_loss" => Some(Self::XpLoss),
            "rank_lock" => Some(Self::RankLock),
            _ => None,
        }
    }
}

/// A recorded penalty effect with optional expiry. Created by the penalty
/// engine, removed by periodic cleanup once expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sanction {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub reason: SanctionReason,
    pub severity: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Sanction {
    pub fn new(
        subject_id: Uuid,
        reason: SanctionReason,
        severity: i64,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            reason,
            severity,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let expiring = Sanction::new(
            Uuid::new_v4(),
            SanctionReason::XpLoss,
            12,
            Some(now - chrono::Duration::hours(1)),
        );
        assert!(expiring.is_expired(now));

        let open_ended = Sanction::new(Uuid::new_v4(), SanctionReason::MissedTask, 3, None);
        assert!(!open_ended.is_expired(now));
    }

    #[test]
    fn test_reason_codec() {
        for r in [
            SanctionReason::MissedTask,
            SanctionReason::XpLoss,
            SanctionReason::RankLock,
        ] {
            assert_eq!(SanctionReason::from_str(r.as_str()), Some(r));
        }
    }
}
