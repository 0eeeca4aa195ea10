//! Ports for the two external advisory collaborators: the judgment oracle and
//! the quest suggester. Both are strictly advisory; the judge contract
//! validates or replaces whatever comes back, and generated tasks always
//! override the suggested target attribute.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::{JudgeRequest, RawJudgeResponse};

/// Errors from the external collaborators. These never escape the judge
/// contract or the task generator; both fall back deterministically.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Service returned status {0}")]
    Status(u16),

    #[error("Service disabled")]
    Disabled,
}

/// Port for the external judgment oracle.
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Ask the oracle to judge a submission. The response is untrusted; the
    /// caller must validate it before acting on any field.
    async fn judge(&self, request: &JudgeRequest) -> Result<RawJudgeResponse, JudgeError>;
}

/// Request for a quest suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionRequest {
    pub attributes: std::collections::HashMap<String, i64>,
    #[serde(rename = "recentFailureCount")]
    pub recent_failure_count: i64,
    pub rank: String,
    #[serde(rename = "targetAttribute")]
    pub target_attribute: String,
    #[serde(rename = "desiredDifficulty")]
    pub desired_difficulty: String,
}

/// A suggested quest. `target_attribute` is advisory only and always
/// overridden by the computed weakest attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestSuggestion {
    #[serde(default)]
    pub kind: Option<String>,
    pub description: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, rename = "targetAttribute")]
    pub target_attribute: Option<String>,
}

/// Port for the external quest-suggestion collaborator.
#[async_trait]
pub trait QuestSuggester: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<QuestSuggestion, JudgeError>;
}
