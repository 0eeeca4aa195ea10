use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::Sanction;

/// Repository port for sanction persistence.
#[async_trait]
pub trait SanctionRepository: Send + Sync {
    /// Insert a new sanction.
    async fn create(&self, sanction: &Sanction) -> DomainResult<()>;

    /// List a subject's sanctions, newest first.
    async fn list_for_subject(&self, subject_id: Uuid) -> DomainResult<Vec<Sanction>>;

    /// Whether the subject has a rank_lock sanction that has not expired.
    async fn has_active_rank_lock(
        &self,
        subject_id: Uuid,
        now: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Delete every sanction whose expiry has passed; returns count removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
