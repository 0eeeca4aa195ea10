//! Verdict model and the judge-response validation contract.
//!
//! The external judgment oracle returns untrusted JSON. Nothing in it is used
//! until the exhaustive validator has turned it into a [`Verdict`]; any
//! violation rejects the whole response and the caller substitutes the
//! deterministic fallback. The oracle never mutates state, and the lifecycle
//! service never sees an invalid verdict.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::attributes::Attribute;
use crate::domain::models::task::Difficulty;

/// Comment stored when the oracle was unavailable or its response rejected.
pub const FALLBACK_COMMENT: &str =
    "Judged automatically: evidence accepted, steady progress recorded.";

/// Outcome of judging a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOutcome {
    Success,
    Fail,
}

/// The validated (or fallback) result of judging a submission. Ephemeral,
/// never persisted as an entity.
///
/// Invariants, guaranteed by construction: a fail verdict has `xp == 0` and
/// empty deltas; a success verdict has `xp > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: VerdictOutcome,
    pub xp: i64,
    pub attribute_deltas: HashMap<Attribute, i64>,
    pub comment: String,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        self.outcome == VerdictOutcome::Success
    }

    /// The deterministic fallback: always a success, XP from the fixed
    /// difficulty table, +1 to the task's target attribute. Intentionally
    /// lenient so oracle unavailability never blocks subject progress.
    pub fn fallback(difficulty: Difficulty, target: Attribute) -> Self {
        Self {
            outcome: VerdictOutcome::Success,
            xp: difficulty.fallback_xp(),
            attribute_deltas: HashMap::from([(target, 1)]),
            comment: FALLBACK_COMMENT.to_string(),
        }
    }
}

/// Raw oracle payload, deserialized loosely so malformed shapes survive to
/// the validator instead of failing serde field-by-field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJudgeResponse {
    #[serde(default)]
    pub outcome: Value,
    #[serde(default)]
    pub xp: Value,
    #[serde(default, rename = "attributeDeltas", alias = "attribute_deltas")]
    pub attribute_deltas: Value,
    #[serde(default)]
    pub comment: Value,
}

impl RawJudgeResponse {
    /// Validate the raw response against the full contract. Either every rule
    /// holds and a `Verdict` is produced, or the response is rejected with the
    /// first violated rule.
    pub fn validate(&self) -> Result<Verdict, String> {
        let outcome = match self.outcome.as_str() {
            Some("success") => VerdictOutcome::Success,
            Some("fail") => VerdictOutcome::Fail,
            Some(other) => return Err(format!("unknown outcome {:?}", other)),
            None => return Err("outcome is not a string".to_string()),
        };

        let xp = self
            .xp
            .as_i64()
            .ok_or_else(|| "xp is not an integer".to_string())?;
        if xp < 0 {
            return Err(format!("xp is negative: {}", xp));
        }

        let deltas = self.parse_deltas()?;

        let comment = match self.comment.as_str() {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            Some(_) => return Err("comment is empty".to_string()),
            None => return Err("comment is not a string".to_string()),
        };

        match outcome {
            VerdictOutcome::Fail => {
                if xp != 0 {
                    return Err(format!("fail verdict carries xp {}", xp));
                }
                if !deltas.is_empty() {
                    return Err("fail verdict carries attribute deltas".to_string());
                }
            }
            VerdictOutcome::Success => {
                if xp == 0 {
                    return Err("success verdict carries zero xp".to_string());
                }
            }
        }

        Ok(Verdict {
            outcome,
            xp,
            attribute_deltas: deltas,
            comment,
        })
    }

    fn parse_deltas(&self) -> Result<HashMap<Attribute, i64>, String> {
        let map = match &self.attribute_deltas {
            Value::Null => return Ok(HashMap::new()),
            Value::Object(map) => map,
            other => return Err(format!("attributeDeltas is not an object: {}", other)),
        };

        let mut deltas = HashMap::new();
        for (key, value) in map {
            let attr = Attribute::from_str(key)
                .ok_or_else(|| format!("unknown attribute {:?}", key))?;
            let delta = value
                .as_i64()
                .ok_or_else(|| format!("delta for {} is not an integer", key))?;
            deltas.insert(attr, delta);
        }
        Ok(deltas)
    }
}

/// The request shipped to the judge oracle: task descriptor, attribute
/// snapshot, and the evidence text.
#[derive(Debug, Clone, Serialize)]
pub struct JudgeRequest {
    pub task: JudgeTaskDescriptor,
    pub attributes: HashMap<String, i64>,
    pub evidence: String,
}

/// Shape-only view of a task, as the oracle sees it.
#[derive(Debug, Clone, Serialize)]
pub struct JudgeTaskDescriptor {
    pub kind: String,
    pub difficulty: String,
    pub description: String,
    #[serde(rename = "targetAttribute")]
    pub target_attribute: String,
    #[serde(rename = "xpReward")]
    pub xp_reward: i64,
    pub deadline: chrono::DateTime<chrono::Utc>,
}
