//! Domain errors for the Ascend progression engine.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the Ascend system.
///
/// `NotFound`/`InvalidState` variants propagate to callers.
/// `ValidationFailed` covers model-level input checks. `ExternalService` is
/// internal to the judge adapters; the judge contract absorbs it into the
/// deterministic fallback verdict, so the task lifecycle never observes it.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Subject not found: {0}")]
    SubjectNotFound(Uuid),

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(Uuid),

    #[error("Attribute set not found for subject: {0}")]
    AttributeSetNotFound(Uuid),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
