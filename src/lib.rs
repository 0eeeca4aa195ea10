//! Ascend - gamified real-life progression engine
//!
//! Ascend tracks a person's self-improvement as a game: six bounded
//! attributes, an XP/level/rank ladder, daily generated tasks judged by an
//! external oracle, and a penalty system for missed work.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic, models, and ports
//! - **Service Layer** (`services`): Progression, task lifecycle, penalties,
//!   and the daily orchestration pipeline
//! - **Adapters** (`adapters`): SQLite repositories and HTTP clients for the
//!   judgment oracle and quest suggester
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Attribute, AttributeSet, Config, Difficulty, Rank, Sanction, Subject, Submission,
    SubmissionStatus, Task, TaskKind, Verdict, VerdictOutcome,
};
pub use services::{Orchestrator, PipelineReport, PipelineScheduler, TaskLifecycle};
