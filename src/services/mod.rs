//! Service layer: domain logic composed over the repository ports.

pub mod attribute_engine;
pub mod judge_contract;
pub mod orchestrator;
pub mod penalty;
pub mod progression;
pub mod scheduler;
pub mod task_lifecycle;

pub use attribute_engine::AttributeEngine;
pub use judge_contract::JudgeContract;
pub use orchestrator::{Orchestrator, PipelineReport};
pub use penalty::{PenaltyEngine, PenaltyKind, PenaltyOutcome};
pub use progression::ProgressionService;
pub use scheduler::PipelineScheduler;
pub use task_lifecycle::TaskLifecycle;
