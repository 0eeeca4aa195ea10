//! Submission domain model and its state machine.
//!
//! A submission tracks one subject's attempt at one task. All three non-pending
//! states are terminal; there are no transitions out of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Awaiting evidence and/or judgment
    Pending,
    /// Judged successful
    Completed,
    /// Judged unsuccessful
    Failed,
    /// Deadline passed without resolution
    Missed,
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Missed => "missed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" | "complete" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "missed" => Some(Self::Missed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> Vec<SubmissionStatus> {
        match self {
            Self::Pending => vec![Self::Completed, Self::Failed, Self::Missed],
            Self::Completed | Self::Failed | Self::Missed => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

/// One subject's attempt at one task.
///
/// Invariant: at most one pending submission per (task, subject) pair. The
/// service checks first and the schema enforces it with a partial unique
/// index, so a concurrent duplicate insert loses at the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub task_id: Uuid,
    pub subject_id: Uuid,
    pub status: SubmissionStatus,
    pub evidence: Option<String>,
    pub verdict_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn new(task_id: Uuid, subject_id: Uuid, evidence: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            task_id,
            subject_id,
            status: SubmissionStatus::Pending,
            evidence,
            verdict_comment: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    pub fn can_transition_to(&self, new_status: SubmissionStatus) -> bool {
        self.status.can_transition_to(new_status)
    }

    /// Move to a new status, stamping `resolved_at` on terminal states.
    pub fn transition_to(&mut self, new_status: SubmissionStatus) -> Result<(), String> {
        if !self.can_transition_to(new_status) {
            return Err(format!(
                "Cannot transition from {} to {}",
                self.status.as_str(),
                new_status.as_str()
            ));
        }
        self.status = new_status;
        let now = Utc::now();
        self.updated_at = now;
        if new_status.is_terminal() {
            self.resolved_at = Some(now);
        }
        Ok(())
    }
}
