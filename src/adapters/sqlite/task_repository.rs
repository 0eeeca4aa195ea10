//! SQLite implementation of the TaskRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Attribute, Difficulty, Task, TaskKind};
use crate::domain::ports::TaskRepository;

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: &Task) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO tasks (id, subject_id, kind, difficulty, description, target_attribute, xp_reward, deadline, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(task.id.to_string())
        .bind(task.subject_id.to_string())
        .bind(task.kind.as_str())
        .bind(task.difficulty.as_str())
        .bind(&task.description)
        .bind(task.target_attribute.as_str())
        .bind(task.xp_reward)
        .bind(task.deadline.to_rfc3339())
        .bind(task.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, subject_id, kind, difficulty, description, target_attribute, xp_reward, deadline, created_at FROM tasks WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn list_for_subject(&self, subject_id: Uuid, limit: i64) -> DomainResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, subject_id, kind, difficulty, description, target_attribute, xp_reward, deadline, created_at FROM tasks WHERE subject_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(subject_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    subject_id: String,
    kind: String,
    difficulty: String,
    description: String,
    target_attribute: String,
    xp_reward: i64,
    deadline: String,
    created_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let kind = TaskKind::from_str(&row.kind)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid kind: {}", row.kind)))?;
        let difficulty = Difficulty::from_str(&row.difficulty).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid difficulty: {}", row.difficulty))
        })?;
        let target_attribute = Attribute::from_str(&row.target_attribute).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid attribute: {}", row.target_attribute))
        })?;

        Ok(Task {
            id: parse_uuid(&row.id)?,
            subject_id: parse_uuid(&row.subject_id)?,
            kind,
            difficulty,
            description: row.description,
            target_attribute,
            xp_reward: row.xp_reward,
            deadline: parse_datetime(&row.deadline)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
