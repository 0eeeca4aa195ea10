//! Experience and rank resolution.
//!
//! `total_xp` is the single source of truth; level and rank are recomputed
//! from it on every change and persisted together in one write.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{calculate_level, Rank, Subject};
use crate::domain::ports::SubjectRepository;

pub struct ProgressionService<S: SubjectRepository> {
    subject_repo: Arc<S>,
}

impl<S: SubjectRepository> ProgressionService<S> {
    pub fn new(subject_repo: Arc<S>) -> Self {
        Self { subject_repo }
    }

    /// Credit or debit lifetime XP. Level and rank are derived from the new
    /// total and persisted atomically with it. A zero amount is a no-op that
    /// still returns current state.
    pub async fn add_xp(&self, subject_id: Uuid, amount: i64) -> DomainResult<Subject> {
        let mut subject = self
            .subject_repo
            .get(subject_id)
            .await?
            .ok_or(DomainError::SubjectNotFound(subject_id))?;

        if amount == 0 {
            return Ok(subject);
        }

        subject.total_xp += amount;
        subject.level = calculate_level(subject.total_xp);
        subject.rank = Rank::for_xp(subject.total_xp);

        self.subject_repo
            .update_progress(subject_id, subject.total_xp, subject.level, subject.rank)
            .await?;

        info!(
            subject_id = %subject_id,
            amount,
            total_xp = subject.total_xp,
            level = subject.level,
            rank = %subject.rank,
            "xp updated"
        );

        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteSubjectRepository};
    use crate::domain::models::rank_progress;

    async fn setup() -> (ProgressionService<SqliteSubjectRepository>, Subject) {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = Arc::new(SqliteSubjectRepository::new(pool));
        let subject = Subject::new("climber");
        repo.create(&subject).await.unwrap();
        (ProgressionService::new(repo), subject)
    }

    #[tokio::test]
    async fn test_add_xp_recomputes_level_and_rank() {
        let (service, subject) = setup().await;

        let updated = service.add_xp(subject.id, 1_118).await.unwrap();
        assert_eq!(updated.total_xp, 1_118);
        assert_eq!(updated.level, 5);
        assert_eq!(updated.rank, Rank::D);

        // Derived purely from the new total, no hidden state
        let again = service.add_xp(subject.id, 3_882).await.unwrap();
        assert_eq!(again.total_xp, 5_000);
        assert_eq!(again.rank, Rank::C);
        assert_eq!(again.level, calculate_level(5_000));
    }

    #[tokio::test]
    async fn test_negative_amount_debits() {
        let (service, subject) = setup().await;
        service.add_xp(subject.id, 2_000).await.unwrap();

        let debited = service.add_xp(subject.id, -1_500).await.unwrap();
        assert_eq!(debited.total_xp, 500);
        assert_eq!(debited.rank, Rank::E);
    }

    #[tokio::test]
    async fn test_zero_amount_is_noop() {
        let (service, subject) = setup().await;
        service.add_xp(subject.id, 300).await.unwrap();

        let unchanged = service.add_xp(subject.id, 0).await.unwrap();
        assert_eq!(unchanged.total_xp, 300);
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let (service, _) = setup().await;
        let result = service.add_xp(Uuid::new_v4(), 10).await;
        assert!(matches!(result, Err(DomainError::SubjectNotFound(_))));
    }

    #[test]
    fn test_rank_progress_within_rank() {
        // D spans [1000, 5000); 3000 is halfway
        assert!((rank_progress(3_000) - 50.0).abs() < 1e-9);
    }
}
