//! Domain models: pure data and the business rules that live on it.

pub mod attributes;
pub mod config;
pub mod sanction;
pub mod subject;
pub mod submission;
pub mod task;
pub mod verdict;

pub use attributes::{clamp_round, Attribute, AttributeSet, DEFAULT_ATTRIBUTE_VALUE};
pub use config::{
    Config, DatabaseConfig, JudgeConfig, LoggingConfig, SchedulerConfig, SuggesterConfig,
};
pub use sanction::{Sanction, SanctionReason};
pub use subject::{calculate_level, rank_progress, xp_required, Rank, Subject};
pub use submission::{Submission, SubmissionStatus};
pub use task::{Difficulty, Task, TaskKind};
pub use verdict::{
    JudgeRequest, JudgeTaskDescriptor, RawJudgeResponse, Verdict, VerdictOutcome, FALLBACK_COMMENT,
};
