//! Judge response contract.
//!
//! The only place the external judgment oracle is consulted. Whatever comes
//! back is validated exhaustively; a rejected, malformed, or absent response
//! is replaced by the deterministic fallback verdict. `evaluate` is therefore
//! infallible by design, and callers never observe oracle errors.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::models::{
    AttributeSet, JudgeRequest, JudgeTaskDescriptor, Task, Verdict,
};
use crate::domain::ports::JudgeClient;

pub struct JudgeContract<J: JudgeClient> {
    judge: Arc<J>,
}

impl<J: JudgeClient> JudgeContract<J> {
    pub fn new(judge: Arc<J>) -> Self {
        Self { judge }
    }

    /// Judge a submission's evidence. Always produces a verdict: the oracle's
    /// validated response when it holds up, the fallback otherwise.
    pub async fn evaluate(&self, task: &Task, attributes: &AttributeSet, evidence: &str) -> Verdict {
        let request = build_request(task, attributes, evidence);

        let raw = match self.judge.judge(&request).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(task_id = %task.id, error = %err, "judge oracle unavailable, using fallback verdict");
                return Verdict::fallback(task.difficulty, task.target_attribute);
            }
        };

        match raw.validate() {
            Ok(verdict) => {
                debug!(task_id = %task.id, outcome = ?verdict.outcome, xp = verdict.xp, "judge response accepted");
                verdict
            }
            Err(reason) => {
                warn!(task_id = %task.id, reason = %reason, "judge response rejected, using fallback verdict");
                Verdict::fallback(task.difficulty, task.target_attribute)
            }
        }
    }
}

fn build_request(task: &Task, attributes: &AttributeSet, evidence: &str) -> JudgeRequest {
    let snapshot: HashMap<String, i64> = attributes
        .iter()
        .map(|(attr, value)| (attr.as_str().to_string(), value))
        .collect();

    JudgeRequest {
        task: JudgeTaskDescriptor {
            kind: task.kind.as_str().to_string(),
            difficulty: task.difficulty.as_str().to_string(),
            description: task.description.clone(),
            target_attribute: task.target_attribute.as_str().to_string(),
            xp_reward: task.xp_reward,
            deadline: task.deadline,
        },
        attributes: snapshot,
        evidence: evidence.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        Attribute, Difficulty, RawJudgeResponse, TaskKind, VerdictOutcome, FALLBACK_COMMENT,
    };
    use crate::domain::ports::JudgeError;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    struct CannedJudge {
        response: Result<serde_json::Value, ()>,
    }

    #[async_trait]
    impl JudgeClient for CannedJudge {
        async fn judge(&self, _request: &JudgeRequest) -> Result<RawJudgeResponse, JudgeError> {
            match &self.response {
                Ok(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                Err(()) => Err(JudgeError::Timeout),
            }
        }
    }

    fn sample_task() -> (Task, AttributeSet) {
        let subject_id = Uuid::new_v4();
        let task = Task::new(
            subject_id,
            TaskKind::Daily,
            Difficulty::Hard,
            "Write a study summary",
            Attribute::Intelligence,
            120,
            Utc::now() + chrono::Duration::hours(3),
        );
        (task, AttributeSet::new(subject_id))
    }

    #[tokio::test]
    async fn test_valid_response_passes_through() {
        let (task, attrs) = sample_task();
        let contract = JudgeContract::new(Arc::new(CannedJudge {
            response: Ok(json!({
                "outcome": "success",
                "xp": 90,
                "attributeDeltas": {"intelligence": 2},
                "comment": "Thorough work."
            })),
        }));

        let verdict = contract.evaluate(&task, &attrs, "summary attached").await;
        assert_eq!(verdict.outcome, VerdictOutcome::Success);
        assert_eq!(verdict.xp, 90);
        assert_eq!(verdict.comment, "Thorough work.");
    }

    #[tokio::test]
    async fn test_oracle_error_falls_back() {
        let (task, attrs) = sample_task();
        let contract = JudgeContract::new(Arc::new(CannedJudge { response: Err(()) }));

        let verdict = contract.evaluate(&task, &attrs, "evidence").await;
        assert_eq!(verdict.outcome, VerdictOutcome::Success);
        assert_eq!(verdict.xp, 100); // hard difficulty fallback
        assert_eq!(
            verdict.attribute_deltas,
            HashMap::from([(Attribute::Intelligence, 1)])
        );
        assert_eq!(verdict.comment, FALLBACK_COMMENT);
    }

    #[tokio::test]
    async fn test_invalid_response_falls_back_entirely() {
        let (task, attrs) = sample_task();
        // fail with nonzero xp: the whole response is discarded, including
        // the comment.
        let contract = JudgeContract::new(Arc::new(CannedJudge {
            response: Ok(json!({
                "outcome": "fail",
                "xp": 7,
                "attributeDeltas": {},
                "comment": "Almost."
            })),
        }));

        let verdict = contract.evaluate(&task, &attrs, "evidence").await;
        assert_eq!(verdict.outcome, VerdictOutcome::Success);
        assert_eq!(verdict.xp, 100);
        assert_eq!(verdict.comment, FALLBACK_COMMENT);
    }
}
