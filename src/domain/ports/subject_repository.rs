use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Rank, Subject};

/// Repository port for subject persistence.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Insert a new subject.
    async fn create(&self, subject: &Subject) -> DomainResult<()>;

    /// Get a subject by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Subject>>;

    /// Get a subject by name.
    async fn get_by_name(&self, name: &str) -> DomainResult<Option<Subject>>;

    /// List all subjects.
    async fn list(&self) -> DomainResult<Vec<Subject>>;

    /// Persist `total_xp`, `level`, and `rank` together in one write. The
    /// three are derived as a unit and must never drift apart.
    async fn update_progress(
        &self,
        id: Uuid,
        total_xp: i64,
        level: i64,
        rank: Rank,
    ) -> DomainResult<()>;
}
