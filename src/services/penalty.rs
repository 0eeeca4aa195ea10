//! Penalty engine: severity index and the escalation ladder.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Attribute, Sanction, SanctionReason};
use crate::domain::ports::{
    AttributeRepository, SanctionRepository, SubjectRepository, SubmissionRepository,
};
use crate::services::attribute_engine::AttributeEngine;
use crate::services::progression::ProgressionService;

/// Trailing window over which missed tasks feed the severity index.
const PSI_WINDOW_DAYS: i64 = 7;

/// Cap on the miss-streak multiplier.
const STREAK_FACTOR_CAP: f64 = 2.0;

/// Longest a rank lock can run, in days.
const RANK_LOCK_CAP_DAYS: i64 = 30;

/// Which rung of the escalation ladder was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    Warning,
    StatDecay,
    XpLoss,
    RankLock,
}

impl PenaltyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::StatDecay => "stat_decay",
            Self::XpLoss => "xp_loss",
            Self::RankLock => "rank_lock",
        }
    }
}

/// Result of applying a miss penalty.
#[derive(Debug, Clone, Serialize)]
pub struct PenaltyOutcome {
    pub psi: i64,
    pub kind: PenaltyKind,
    pub details: String,
}

pub struct PenaltyEngine<S, A, Sub, Sa>
where
    S: SubjectRepository,
    A: AttributeRepository,
    Sub: SubmissionRepository,
    Sa: SanctionRepository,
{
    submission_repo: Arc<Sub>,
    sanction_repo: Arc<Sa>,
    progression: ProgressionService<S>,
    attributes: AttributeEngine<A, Sub>,
}

impl<S, A, Sub, Sa> PenaltyEngine<S, A, Sub, Sa>
where
    S: SubjectRepository,
    A: AttributeRepository,
    Sub: SubmissionRepository,
    Sa: SanctionRepository,
{
    pub fn new(
        subject_repo: Arc<S>,
        attribute_repo: Arc<A>,
        submission_repo: Arc<Sub>,
        sanction_repo: Arc<Sa>,
    ) -> Self {
        Self {
            progression: ProgressionService::new(subject_repo),
            attributes: AttributeEngine::new(attribute_repo, submission_repo.clone()),
            submission_repo,
            sanction_repo,
        }
    }

    /// Penalty Severity Index over the trailing 7 days: sum of per-miss
    /// difficulty weights, scaled by `min(missed_count * 0.1 + 1, 2.0)`,
    /// floored to an integer. No misses yields 0.
    pub async fn calculate_psi(&self, subject_id: Uuid) -> DomainResult<i64> {
        let since = Utc::now() - Duration::days(PSI_WINDOW_DAYS);
        let missed = self
            .submission_repo
            .list_missed_since(subject_id, since)
            .await?;

        if missed.is_empty() {
            return Ok(0);
        }

        let weight_sum: i64 = missed.iter().map(|m| m.difficulty.miss_weight()).sum();
        let streak_factor = (missed.len() as f64 * 0.1 + 1.0).min(STREAK_FACTOR_CAP);
        Ok((weight_sum as f64 * streak_factor).floor() as i64)
    }

    /// Apply the escalation ladder for a given PSI.
    pub async fn apply_penalty(
        &self,
        subject_id: Uuid,
        psi: i64,
    ) -> DomainResult<PenaltyOutcome> {
        let now = Utc::now();
        let outcome = match psi {
            _ if psi < 5 => {
                self.sanction_repo
                    .create(&Sanction::new(
                        subject_id,
                        SanctionReason::MissedTask,
                        psi,
                        None,
                    ))
                    .await?;
                PenaltyOutcome {
                    psi,
                    kind: PenaltyKind::Warning,
                    details: "warning recorded, no state change".to_string(),
                }
            }
            _ if psi < 10 => {
                let deltas = HashMap::from([
                    (Attribute::Discipline, -1.0),
                    (Attribute::Confidence, -0.5),
                ]);
                self.attributes.apply_delta(subject_id, &deltas).await?;
                self.sanction_repo
                    .create(&Sanction::new(
                        subject_id,
                        SanctionReason::MissedTask,
                        psi,
                        None,
                    ))
                    .await?;
                PenaltyOutcome {
                    psi,
                    kind: PenaltyKind::StatDecay,
                    details: "discipline -1, confidence -0.5".to_string(),
                }
            }
            _ if psi < 20 => {
                let debit = (psi as f64 * 2.0).round() as i64;
                self.progression.add_xp(subject_id, -debit).await?;
                self.sanction_repo
                    .create(&Sanction::new(
                        subject_id,
                        SanctionReason::XpLoss,
                        psi,
                        Some(now + Duration::hours(24)),
                    ))
                    .await?;
                PenaltyOutcome {
                    psi,
                    kind: PenaltyKind::XpLoss,
                    details: format!("debited {} xp", debit),
                }
            }
            _ => {
                let lock_days = (psi / 5).min(RANK_LOCK_CAP_DAYS);
                self.sanction_repo
                    .create(&Sanction::new(
                        subject_id,
                        SanctionReason::RankLock,
                        psi,
                        Some(now + Duration::days(lock_days)),
                    ))
                    .await?;
                PenaltyOutcome {
                    psi,
                    kind: PenaltyKind::RankLock,
                    details: format!("rank locked for {} days", lock_days),
                }
            }
        };

        info!(
            subject_id = %subject_id,
            psi,
            kind = outcome.kind.as_str(),
            "penalty applied"
        );
        Ok(outcome)
    }

    /// Compute PSI and apply the ladder; PSI 0 short-circuits to no penalty.
    pub async fn apply_miss_penalty(
        &self,
        subject_id: Uuid,
    ) -> DomainResult<Option<PenaltyOutcome>> {
        let psi = self.calculate_psi(subject_id).await?;
        if psi == 0 {
            return Ok(None);
        }
        let outcome = self.apply_penalty(subject_id, psi).await?;
        Ok(Some(outcome))
    }

    /// Whether an unexpired rank_lock sanction exists. Rank-gated actions
    /// must check this before proceeding.
    pub async fn is_rank_locked(&self, subject_id: Uuid) -> DomainResult<bool> {
        self.sanction_repo
            .has_active_rank_lock(subject_id, Utc::now())
            .await
    }

    /// Delete all expired sanctions; returns count removed.
    pub async fn cleanup_expired_sanctions(&self) -> DomainResult<u64> {
        let removed = self.sanction_repo.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "expired sanctions cleaned up");
        }
        Ok(removed)
    }
}
