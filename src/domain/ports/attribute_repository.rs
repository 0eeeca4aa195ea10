use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::AttributeSet;

/// Repository port for attribute-set persistence. Exactly one set exists per
/// subject, created alongside the subject.
#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// Insert the initial attribute set for a subject.
    async fn create(&self, set: &AttributeSet) -> DomainResult<()>;

    /// Get the attribute set for a subject.
    async fn get(&self, subject_id: Uuid) -> DomainResult<Option<AttributeSet>>;

    /// Persist updated attribute values.
    async fn update(&self, set: &AttributeSet) -> DomainResult<()>;
}
