use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Difficulty, Submission};

/// A missed submission joined with its task's difficulty, as needed by the
/// penalty severity computation.
#[derive(Debug, Clone)]
pub struct MissedSubmission {
    pub submission: Submission,
    pub difficulty: Difficulty,
}

/// Repository port for submission persistence.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Insert a new submission. Fails at the database when a pending
    /// submission already exists for the same (task, subject) pair.
    async fn create(&self, submission: &Submission) -> DomainResult<()>;

    /// Get a submission by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Submission>>;

    /// Update an existing submission.
    async fn update(&self, submission: &Submission) -> DomainResult<()>;

    /// The pending submission for a (task, subject) pair, if one exists.
    async fn get_pending_for_task(
        &self,
        task_id: Uuid,
        subject_id: Uuid,
    ) -> DomainResult<Option<Submission>>;

    /// All pending submissions for a subject.
    async fn list_pending_for_subject(&self, subject_id: Uuid) -> DomainResult<Vec<Submission>>;

    /// Count of failed and missed submissions resolved since `since`. Drives
    /// the difficulty-scaling policy.
    async fn count_recent_failures(
        &self,
        subject_id: Uuid,
        since: DateTime<Utc>,
    ) -> DomainResult<i64>;

    /// Missed submissions resolved since `since`, with task difficulty.
    async fn list_missed_since(
        &self,
        subject_id: Uuid,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<MissedSubmission>>;

    /// Whether a daily-kind task was completed at or after `since`. Drives
    /// decay suppression on compliance.
    async fn completed_daily_since(
        &self,
        subject_id: Uuid,
        since: DateTime<Utc>,
    ) -> DomainResult<bool>;
}
