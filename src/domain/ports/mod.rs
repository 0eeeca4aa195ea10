//! Ports: trait boundaries between the domain and the outside world.

pub mod attribute_repository;
pub mod judge;
pub mod sanction_repository;
pub mod subject_repository;
pub mod submission_repository;
pub mod task_repository;

pub use attribute_repository::AttributeRepository;
pub use judge::{JudgeClient, JudgeError, QuestSuggester, QuestSuggestion, SuggestionRequest};
pub use sanction_repository::SanctionRepository;
pub use subject_repository::SubjectRepository;
pub use submission_repository::{MissedSubmission, SubmissionRepository};
pub use task_repository::TaskRepository;
