//! SQLite implementation of the SanctionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_optional_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Sanction, SanctionReason};
use crate::domain::ports::SanctionRepository;

#[derive(Clone)]
pub struct SqliteSanctionRepository {
    pool: SqlitePool,
}

impl SqliteSanctionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SanctionRepository for SqliteSanctionRepository {
    async fn create(&self, sanction: &Sanction) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO sanctions (id, subject_id, reason, severity, expires_at, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(sanction.id.to_string())
        .bind(sanction.subject_id.to_string())
        .bind(sanction.reason.as_str())
        .bind(sanction.severity)
        .bind(sanction.expires_at.map(|dt| dt.to_rfc3339()))
        .bind(sanction.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_subject(&self, subject_id: Uuid) -> DomainResult<Vec<Sanction>> {
        let rows: Vec<SanctionRow> = sqlx::query_as(
            "SELECT id, subject_id, reason, severity, expires_at, created_at FROM sanctions WHERE subject_id = ? ORDER BY created_at DESC",
        )
        .bind(subject_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn has_active_rank_lock(
        &self,
        subject_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM sanctions
               WHERE subject_id = ? AND reason = 'rank_lock'
                 AND (expires_at IS NULL OR expires_at > ?)"#,
        )
        .bind(subject_id.to_string())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = sqlx::query(
            "DELETE FROM sanctions WHERE expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct SanctionRow {
    id: String,
    subject_id: String,
    reason: String,
    severity: i64,
    expires_at: Option<String>,
    created_at: String,
}

impl TryFrom<SanctionRow> for Sanction {
    type Error = DomainError;

    fn try_from(row: SanctionRow) -> Result<Self, Self::Error> {
        let reason = SanctionReason::from_str(&row.reason).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid reason: {}", row.reason))
        })?;

        Ok(Sanction {
            id: parse_uuid(&row.id)?,
            subject_id: parse_uuid(&row.subject_id)?,
            reason,
            severity: row.severity,
            expires_at: parse_optional_datetime(row.expires_at)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteSubjectRepository};
    use crate::domain::models::Subject;
    use crate::domain::ports::SubjectRepository;
    use chrono::Duration;

    async fn setup() -> (SqliteSanctionRepository, Subject) {
        let pool = create_migrated_test_pool().await.unwrap();
        let subjects = SqliteSubjectRepository::new(pool.clone());
        let subject = Subject::new("tester");
        subjects.create(&subject).await.unwrap();
        (SqliteSanctionRepository::new(pool), subject)
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let (repo, subject) = setup().await;

        let mut older = Sanction::new(subject.id, SanctionReason::MissedTask, 3, None);
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = Sanction::new(subject.id, SanctionReason::XpLoss, 14, None);
        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let sanctions = repo.list_for_subject(subject.id).await.unwrap();
        assert_eq!(sanctions.len(), 2);
        assert_eq!(sanctions[0].reason, SanctionReason::XpLoss);
    }

    #[tokio::test]
    async fn test_rank_lock_detection() {
        let (repo, subject) = setup().await;
        let now = Utc::now();

        assert!(!repo.has_active_rank_lock(subject.id, now).await.unwrap());

        let lock = Sanction::new(
            subject.id,
            SanctionReason::RankLock,
            25,
            Some(now + Duration::days(5)),
        );
        repo.create(&lock).await.unwrap();
        assert!(repo.has_active_rank_lock(subject.id, now).await.unwrap());

        // An expired lock no longer counts.
        assert!(!repo
            .has_active_rank_lock(subject.id, now + Duration::days(6))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_unexpiring() {
        let (repo, subject) = setup().await;
        let now = Utc::now();

        let expired = Sanction::new(
            subject.id,
            SanctionReason::XpLoss,
            10,
            Some(now - Duration::hours(1)),
        );
        let active = Sanction::new(
            subject.id,
            SanctionReason::RankLock,
            20,
            Some(now + Duration::days(1)),
        );
        let permanent = Sanction::new(subject.id, SanctionReason::MissedTask, 3, None);
        repo.create(&expired).await.unwrap();
        repo.create(&active).await.unwrap();
        repo.create(&permanent).await.unwrap();

        let removed = repo.delete_expired(now).await.unwrap();
        assert_eq!(removed, 1);

        let remaining = repo.list_for_subject(subject.id).await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|s| s.id != expired.id));
    }
}
