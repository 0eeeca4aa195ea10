use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Task;

/// Repository port for task persistence. Tasks are immutable after creation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task.
    async fn create(&self, task: &Task) -> DomainResult<()>;

    /// Get a task by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>>;

    /// List a subject's tasks, newest first.
    async fn list_for_subject(&self, subject_id: Uuid, limit: i64) -> DomainResult<Vec<Task>>;
}
