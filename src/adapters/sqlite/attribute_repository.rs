//! SQLite implementation of the AttributeRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::parse_uuid;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AttributeSet;
use crate::domain::ports::AttributeRepository;

#[derive(Clone)]
pub struct SqliteAttributeRepository {
    pool: SqlitePool,
}

impl SqliteAttributeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttributeRepository for SqliteAttributeRepository {
    async fn create(&self, set: &AttributeSet) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO attribute_sets (subject_id, physical, intelligence, discipline, charisma, confidence, creativity)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(set.subject_id.to_string())
        .bind(set.physical)
        .bind(set.intelligence)
        .bind(set.discipline)
        .bind(set.charisma)
        .bind(set.confidence)
        .bind(set.creativity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, subject_id: Uuid) -> DomainResult<Option<AttributeSet>> {
        let row: Option<AttributeSetRow> = sqlx::query_as(
            "SELECT subject_id, physical, intelligence, discipline, charisma, confidence, creativity FROM attribute_sets WHERE subject_id = ?",
        )
        .bind(subject_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn update(&self, set: &AttributeSet) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE attribute_sets SET physical = ?, intelligence = ?, discipline = ?,
               charisma = ?, confidence = ?, creativity = ?
               WHERE subject_id = ?"#,
        )
        .bind(set.physical)
        .bind(set.intelligence)
        .bind(set.discipline)
        .bind(set.charisma)
        .bind(set.confidence)
        .bind(set.creativity)
        .bind(set.subject_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AttributeSetNotFound(set.subject_id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct AttributeSetRow {
    subject_id: String,
    physical: i64,
    intelligence: i64,
    discipline: i64,
    charisma: i64,
    confidence: i64,
    creativity: i64,
}

impl TryFrom<AttributeSetRow> for AttributeSet {
    type Error = DomainError;

    fn try_from(row: AttributeSetRow) -> Result<Self, Self::Error> {
        Ok(AttributeSet {
            subject_id: parse_uuid(&row.subject_id)?,
            physical: row.physical,
            intelligence: row.intelligence,
            discipline: row.discipline,
            charisma: row.charisma,
            confidence: row.confidence,
            creativity: row.creativity,
        })
    }
}
