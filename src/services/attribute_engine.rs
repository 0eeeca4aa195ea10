//! Attribute engine: relative-delta application and daily decay.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{clamp_round, Attribute, AttributeSet};
use crate::domain::ports::{AttributeRepository, SubmissionRepository};

/// Per-day decay deltas, applied unless the subject completed a daily task
/// within the current calendar day. Sub-unit rates round away against integer
/// storage; that per-application rounding is the accepted behavior.
pub const DAILY_DECAY: [(Attribute, f64); 6] = [
    (Attribute::Physical, -0.1),
    (Attribute::Intelligence, -0.05),
    (Attribute::Discipline, -0.2),
    (Attribute::Charisma, -0.05),
    (Attribute::Confidence, -0.05),
    (Attribute::Creativity, -0.05),
];

/// Owns all mutation of attribute values. Every change goes through
/// `apply_delta`, so the clamp-and-round law holds everywhere.
pub struct AttributeEngine<A: AttributeRepository, S: SubmissionRepository> {
    attribute_repo: Arc<A>,
    submission_repo: Arc<S>,
}

impl<A: AttributeRepository, S: SubmissionRepository> AttributeEngine<A, S> {
    pub fn new(attribute_repo: Arc<A>, submission_repo: Arc<S>) -> Self {
        Self {
            attribute_repo,
            submission_repo,
        }
    }

    /// Apply relative deltas: each named attribute becomes
    /// `round(clamp(old + delta, 0, 100))`; unnamed attributes are unchanged.
    pub async fn apply_delta(
        &self,
        subject_id: Uuid,
        deltas: &HashMap<Attribute, f64>,
    ) -> DomainResult<AttributeSet> {
        let mut set = self
            .attribute_repo
            .get(subject_id)
            .await?
            .ok_or(DomainError::AttributeSetNotFound(subject_id))?;

        for (attr, delta) in deltas {
            let old = set.get(*attr);
            let new = clamp_round(old as f64 + delta);
            set.set(*attr, new);
            debug!(subject_id = %subject_id, attribute = %attr, old, new, delta, "applied attribute delta");
        }

        self.attribute_repo.update(&set).await?;
        Ok(set)
    }

    /// Apply the fixed daily decay, unless the subject completed a daily-kind
    /// task within the current UTC calendar day — compliance suppresses decay
    /// and leaves state untouched, returning `None`.
    pub async fn apply_daily_decay(&self, subject_id: Uuid) -> DomainResult<Option<AttributeSet>> {
        let start_of_day = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();

        if self
            .submission_repo
            .completed_daily_since(subject_id, start_of_day)
            .await?
        {
            info!(subject_id = %subject_id, "daily task completed today, decay suppressed");
            return Ok(None);
        }

        let deltas: HashMap<Attribute, f64> = DAILY_DECAY.into_iter().collect();
        let set = self.apply_delta(subject_id, &deltas).await?;
        Ok(Some(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteAttributeRepository, SqliteSubjectRepository,
        SqliteSubmissionRepository, SqliteTaskRepository,
    };
    use crate::domain::models::{
        Difficulty, Subject, Submission, SubmissionStatus, Task, TaskKind,
    };
    use crate::domain::ports::{SubjectRepository, TaskRepository};
    use proptest::prelude::*;

    async fn setup() -> (
        AttributeEngine<SqliteAttributeRepository, SqliteSubmissionRepository>,
        Arc<SqliteAttributeRepository>,
        Arc<SqliteSubmissionRepository>,
        Arc<SqliteTaskRepository>,
        Subject,
    ) {
        let pool = create_migrated_test_pool().await.unwrap();
        let subject_repo = SqliteSubjectRepository::new(pool.clone());
        let attribute_repo = Arc::new(SqliteAttributeRepository::new(pool.clone()));
        let submission_repo = Arc::new(SqliteSubmissionRepository::new(pool.clone()));
        let task_repo = Arc::new(SqliteTaskRepository::new(pool));

        let subject = Subject::new("tester");
        subject_repo.create(&subject).await.unwrap();
        attribute_repo
            .create(&AttributeSet::new(subject.id))
            .await
            .unwrap();

        let engine = AttributeEngine::new(attribute_repo.clone(), submission_repo.clone());
        (engine, attribute_repo, submission_repo, task_repo, subject)
    }

    #[tokio::test]
    async fn test_apply_delta_clamps_and_persists() {
        let (engine, attribute_repo, _, _, subject) = setup().await;

        let deltas = HashMap::from([(Attribute::Physical, 75.0), (Attribute::Discipline, -80.0)]);
        let set = engine.apply_delta(subject.id, &deltas).await.unwrap();
        assert_eq!(set.physical, 100);
        assert_eq!(set.discipline, 0);
        // Untouched attribute stays put
        assert_eq!(set.charisma, 50);

        let stored = attribute_repo.get(subject.id).await.unwrap().unwrap();
        assert_eq!(stored, set);
    }

    #[tokio::test]
    async fn test_apply_delta_unknown_subject() {
        let (engine, _, _, _, _) = setup().await;
        let result = engine
            .apply_delta(Uuid::new_v4(), &HashMap::from([(Attribute::Physical, 1.0)]))
            .await;
        assert!(matches!(result, Err(DomainError::AttributeSetNotFound(_))));
    }

    #[tokio::test]
    async fn test_decay_applies_without_compliance() {
        let (engine, _, _, _, subject) = setup().await;
        let set = engine.apply_daily_decay(subject.id).await.unwrap();
        // No daily completed today: decay runs. Sub-unit rates round away
        // against integer values, so 50 stays 50.
        let set = set.expect("decay should apply");
        assert_eq!(set.discipline, 50);
        assert_eq!(set.physical, 50);
    }

    #[tokio::test]
    async fn test_decay_suppressed_after_daily_completion() {
        let (engine, _, submission_repo, task_repo, subject) = setup().await;

        let task = Task::new(
            subject.id,
            TaskKind::Daily,
            Difficulty::Easy,
            "Morning routine",
            Attribute::Discipline,
            20,
            Utc::now() + chrono::Duration::hours(2),
        );
        task_repo.create(&task).await.unwrap();

        let mut submission = Submission::new(task.id, subject.id, Some("done".to_string()));
        submission_repo.create(&submission).await.unwrap();
        submission
            .transition_to(SubmissionStatus::Completed)
            .unwrap();
        submission_repo.update(&submission).await.unwrap();

        let result = engine.apply_daily_decay(subject.id).await.unwrap();
        assert!(result.is_none());
    }

    proptest! {
        #[test]
        fn prop_clamp_law(start in 0i64..=100, delta in -500.0f64..500.0) {
            let value = clamp_round(start as f64 + delta);
            prop_assert!((0..=100).contains(&value));
        }
    }
}
