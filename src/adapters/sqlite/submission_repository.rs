//! SQLite implementation of the SubmissionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_optional_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Difficulty, Submission, SubmissionStatus};
use crate::domain::ports::{MissedSubmission, SubmissionRepository};

const SUBMISSION_COLUMNS: &str =
    "id, task_id, subject_id, status, evidence, verdict_comment, created_at, updated_at, resolved_at";

#[derive(Clone)]
pub struct SqliteSubmissionRepository {
    pool: SqlitePool,
}

impl SqliteSubmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionRepository for SqliteSubmissionRepository {
    async fn create(&self, submission: &Submission) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO submissions (id, task_id, subject_id, status, evidence, verdict_comment, created_at, updated_at, resolved_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(submission.id.to_string())
        .bind(submission.task_id.to_string())
        .bind(submission.subject_id.to_string())
        .bind(submission.status.as_str())
        .bind(&submission.evidence)
        .bind(&submission.verdict_comment)
        .bind(submission.created_at.to_rfc3339())
        .bind(submission.updated_at.to_rfc3339())
        .bind(submission.resolved_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Submission>> {
        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn update(&self, submission: &Submission) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE submissions SET status = ?, evidence = ?, verdict_comment = ?,
               updated_at = ?, resolved_at = ?
               WHERE id = ?"#,
        )
        .bind(submission.status.as_str())
        .bind(&submission.evidence)
        .bind(&submission.verdict_comment)
        .bind(submission.updated_at.to_rfc3339())
        .bind(submission.resolved_at.map(|dt| dt.to_rfc3339()))
        .bind(submission.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SubmissionNotFound(submission.id));
        }

        Ok(())
    }

    async fn get_pending_for_task(
        &self,
        task_id: Uuid,
        subject_id: Uuid,
    ) -> DomainResult<Option<Submission>> {
        let row: Option<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE task_id = ? AND subject_id = ? AND status = 'pending'"
        ))
        .bind(task_id.to_string())
        .bind(subject_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn list_pending_for_subject(&self, subject_id: Uuid) -> DomainResult<Vec<Submission>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE subject_id = ? AND status = 'pending' ORDER BY created_at"
        ))
        .bind(subject_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn count_recent_failures(
        &self,
        subject_id: Uuid,
        since: DateTime<Utc>,
    ) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM submissions
               WHERE subject_id = ? AND status IN ('failed', 'missed') AND resolved_at >= ?"#,
        )
        .bind(subject_id.to_string())
        .bind(since.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_missed_since(
        &self,
        subject_id: Uuid,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<MissedSubmission>> {
        let rows: Vec<MissedRow> = sqlx::query_as(
            r#"SELECT s.id, s.task_id, s.subject_id, s.status, s.evidence, s.verdict_comment,
                      s.created_at, s.updated_at, s.resolved_at, t.difficulty
               FROM submissions s
               JOIN tasks t ON t.id = s.task_id
               WHERE s.subject_id = ? AND s.status = 'missed' AND s.resolved_at >= ?
               ORDER BY s.resolved_at"#,
        )
        .bind(subject_id.to_string())
        .bind(since.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let difficulty = Difficulty::from_str(&row.difficulty).ok_or_else(|| {
                    DomainError::SerializationError(format!(
                        "Invalid difficulty: {}",
                        row.difficulty
                    ))
                })?;
                Ok(MissedSubmission {
                    submission: row.submission.try_into()?,
                    difficulty,
                })
            })
            .collect()
    }

    async fn completed_daily_since(
        &self,
        subject_id: Uuid,
        since: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM submissions s
               JOIN tasks t ON t.id = s.task_id
               WHERE s.subject_id = ? AND s.status = 'completed'
                 AND t.kind = 'daily' AND s.resolved_at >= ?"#,
        )
        .bind(subject_id.to_string())
        .bind(since.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: String,
    task_id: String,
    subject_id: String,
    status: String,
    evidence: Option<String>,
    verdict_comment: Option<String>,
    created_at: String,
    updated_at: String,
    resolved_at: Option<String>,
}

#[derive(sqlx::FromRow)]
struct MissedRow {
    #[sqlx(flatten)]
    submission: SubmissionRow,
    difficulty: String,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = DomainError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let status = SubmissionStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid status: {}", row.status))
        })?;

        Ok(Submission {
            id: parse_uuid(&row.id)?,
            task_id: parse_uuid(&row.task_id)?,
            subject_id: parse_uuid(&row.subject_id)?,
            status,
            evidence: row.evidence,
            verdict_comment: row.verdict_comment,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            resolved_at: parse_optional_datetime(row.resolved_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteSubjectRepository, SqliteTaskRepository,
    };
    use crate::domain::models::{Attribute, Subject, Task, TaskKind};
    use crate::domain::ports::{SubjectRepository, TaskRepository};
    use chrono::Duration;

    struct Fixture {
        repo: SqliteSubmissionRepository,
        task_repo: SqliteTaskRepository,
        subject: Subject,
    }

    async fn setup() -> Fixture {
        let pool = create_migrated_test_pool().await.unwrap();
        let subjects = SqliteSubjectRepository::new(pool.clone());
        let subject = Subject::new("tester");
        subjects.create(&subject).await.unwrap();
        Fixture {
            repo: SqliteSubmissionRepository::new(pool.clone()),
            task_repo: SqliteTaskRepository::new(pool),
            subject,
        }
    }

    async fn add_task(fixture: &Fixture, kind: TaskKind, difficulty: Difficulty) -> Task {
        let task = Task::new(
            fixture.subject.id,
            kind,
            difficulty,
            "test task",
            Attribute::Physical,
            50,
            Utc::now() + Duration::hours(4),
        );
        fixture.task_repo.create(&task).await.unwrap();
        task
    }

    async fn resolve(
        fixture: &Fixture,
        submission: &Submission,
        status: SubmissionStatus,
        resolved_at: DateTime<Utc>,
    ) {
        let mut resolved = submission.clone();
        resolved.status = status;
        resolved.resolved_at = Some(resolved_at);
        fixture.repo.update(&resolved).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_get_update() {
        let fixture = setup().await;
        let task = add_task(&fixture, TaskKind::Daily, Difficulty::Easy).await;

        let submission = Submission::new(task.id, fixture.subject.id, None);
        fixture.repo.create(&submission).await.unwrap();

        let fetched = fixture.repo.get(submission.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, SubmissionStatus::Pending);
        assert!(fetched.evidence.is_none());

        let mut with_evidence = fetched.clone();
        with_evidence.evidence = Some("proof".to_string());
        fixture.repo.update(&with_evidence).await.unwrap();

        let fetched = fixture.repo.get(submission.id).await.unwrap().unwrap();
        assert_eq!(fetched.evidence.as_deref(), Some("proof"));
    }

    #[tokio::test]
    async fn test_duplicate_pending_rejected() {
        let fixture = setup().await;
        let task = add_task(&fixture, TaskKind::Daily, Difficulty::Easy).await;

        fixture
            .repo
            .create(&Submission::new(task.id, fixture.subject.id, None))
            .await
            .unwrap();
        let duplicate = Submission::new(task.id, fixture.subject.id, None);
        assert!(fixture.repo.create(&duplicate).await.is_err());
    }

    #[tokio::test]
    async fn test_get_pending_for_task_ignores_terminal() {
        let fixture = setup().await;
        let task = add_task(&fixture, TaskKind::Daily, Difficulty::Easy).await;

        let submission = Submission::new(task.id, fixture.subject.id, None);
        fixture.repo.create(&submission).await.unwrap();
        assert!(fixture
            .repo
            .get_pending_for_task(task.id, fixture.subject.id)
            .await
            .unwrap()
            .is_some());

        resolve(&fixture, &submission, SubmissionStatus::Failed, Utc::now()).await;
        assert!(fixture
            .repo
            .get_pending_for_task(task.id, fixture.subject.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_count_recent_failures_window() {
        let fixture = setup().await;
        let now = Utc::now();

        for (status, age_days) in [
            (SubmissionStatus::Failed, 1),
            (SubmissionStatus::Missed, 5),
            // Outside the window.
            (SubmissionStatus::Failed, 30),
            // Completed never counts.
            (SubmissionStatus::Completed, 1),
        ] {
            let task = add_task(&fixture, TaskKind::Daily, Difficulty::Easy).await;
            let submission = Submission::new(task.id, fixture.subject.id, None);
            fixture.repo.create(&submission).await.unwrap();
            resolve(&fixture, &submission, status, now - Duration::days(age_days)).await;
        }

        let count = fixture
            .repo
            .count_recent_failures(fixture.subject.id, now - Duration::days(21))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_list_missed_since_carries_difficulty() {
        let fixture = setup().await;
        let now = Utc::now();

        let hard = add_task(&fixture, TaskKind::Daily, Difficulty::Hard).await;
        let submission = Submission::new(hard.id, fixture.subject.id, None);
        fixture.repo.create(&submission).await.unwrap();
        resolve(&fixture, &submission, SubmissionStatus::Missed, now - Duration::days(2)).await;

        let missed = fixture
            .repo
            .list_missed_since(fixture.subject.id, now - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].difficulty, Difficulty::Hard);
        assert_eq!(missed[0].submission.status, SubmissionStatus::Missed);
    }

    #[tokio::test]
    async fn test_completed_daily_since() {
        let fixture = setup().await;
        let now = Utc::now();

        assert!(!fixture
            .repo
            .completed_daily_since(fixture.subject.id, now - Duration::hours(12))
            .await
            .unwrap());

        let task = add_task(&fixture, TaskKind::Daily, Difficulty::Easy).await;
        let submission = Submission::new(task.id, fixture.subject.id, None);
        fixture.repo.create(&submission).await.unwrap();
        resolve(&fixture, &submission, SubmissionStatus::Completed, now - Duration::hours(2)).await;

        assert!(fixture
            .repo
            .completed_daily_since(fixture.subject.id, now - Duration::hours(12))
            .await
            .unwrap());
        // A completion before the cutoff does not count.
        assert!(!fixture
            .repo
            .completed_daily_since(fixture.subject.id, now - Duration::hours(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_weekly_completion_does_not_suppress() {
        let fixture = setup().await;
        let now = Utc::now();

        let task = add_task(&fixture, TaskKind::Weekly, Difficulty::Easy).await;
        let submission = Submission::new(task.id, fixture.subject.id, None);
        fixture.repo.create(&submission).await.unwrap();
        resolve(&fixture, &submission, SubmissionStatus::Completed, now).await;

        assert!(!fixture
            .repo
            .completed_daily_since(fixture.subject.id, now - Duration::hours(12))
            .await
            .unwrap());
    }
}
