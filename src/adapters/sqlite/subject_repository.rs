//! SQLite implementation of the SubjectRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Rank, Subject};
use crate::domain::ports::SubjectRepository;

#[derive(Clone)]
pub struct SqliteSubjectRepository {
    pool: SqlitePool,
}

impl SqliteSubjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubjectRepository for SqliteSubjectRepository {
    async fn create(&self, subject: &Subject) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO subjects (id, name, rank, level, total_xp, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(subject.id.to_string())
        .bind(&subject.name)
        .bind(subject.rank.as_str())
        .bind(subject.level)
        .bind(subject.total_xp)
        .bind(subject.created_at.to_rfc3339())
        .bind(subject.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Subject>> {
        let row: Option<SubjectRow> = sqlx::query_as(
            "SELECT id, name, rank, level, total_xp, created_at, updated_at FROM subjects WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn get_by_name(&self, name: &str) -> DomainResult<Option<Subject>> {
        let row: Option<SubjectRow> = sqlx::query_as(
            "SELECT id, name, rank, level, total_xp, created_at, updated_at FROM subjects WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Subject>> {
        let rows: Vec<SubjectRow> = sqlx::query_as(
            "SELECT id, name, rank, level, total_xp, created_at, updated_at FROM subjects ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn update_progress(
        &self,
        id: Uuid,
        total_xp: i64,
        level: i64,
        rank: Rank,
    ) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE subjects SET total_xp = ?, level = ?, rank = ?, updated_at = ? WHERE id = ?",
        )
        .bind(total_xp)
        .bind(level)
        .bind(rank.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SubjectNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SubjectRow {
    id: String,
    name: String,
    rank: String,
    level: i64,
    total_xp: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<SubjectRow> for Subject {
    type Error = DomainError;

    fn try_from(row: SubjectRow) -> Result<Self, Self::Error> {
        let rank = Rank::from_str(&row.rank)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid rank: {}", row.rank)))?;

        Ok(Subject {
            id: parse_uuid(&row.id)?,
            name: row.name,
            rank,
            level: row.level,
            total_xp: row.total_xp,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
