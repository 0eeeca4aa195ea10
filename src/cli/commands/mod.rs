//! CLI command implementations.

pub mod init;
pub mod pipeline;
pub mod status;
pub mod subject;
pub mod task;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use uuid::Uuid;

use crate::adapters::judge::{HttpJudgeClient, HttpQuestSuggester};
use crate::adapters::sqlite::{
    initialize_database, SqliteAttributeRepository, SqliteSanctionRepository,
    SqliteSubjectRepository, SqliteSubmissionRepository, SqliteTaskRepository,
};
use crate::domain::models::{Config, Subject};
use crate::domain::ports::SubjectRepository;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{Orchestrator, PenaltyEngine, TaskLifecycle};

pub(crate) type AppLifecycle = TaskLifecycle<
    SqliteSubjectRepository,
    SqliteAttributeRepository,
    SqliteTaskRepository,
    SqliteSubmissionRepository,
    HttpJudgeClient,
    HttpQuestSuggester,
>;

pub(crate) type AppOrchestrator = Orchestrator<
    SqliteSubjectRepository,
    SqliteAttributeRepository,
    SqliteTaskRepository,
    SqliteSubmissionRepository,
    SqliteSanctionRepository,
    HttpJudgeClient,
    HttpQuestSuggester,
>;

pub(crate) type AppPenaltyEngine = PenaltyEngine<
    SqliteSubjectRepository,
    SqliteAttributeRepository,
    SqliteSubmissionRepository,
    SqliteSanctionRepository,
>;

/// Wired repositories and external clients, shared by every command.
pub(crate) struct AppContext {
    pub config: Config,
    pub subject_repo: Arc<SqliteSubjectRepository>,
    pub attribute_repo: Arc<SqliteAttributeRepository>,
    pub task_repo: Arc<SqliteTaskRepository>,
    pub submission_repo: Arc<SqliteSubmissionRepository>,
    pub sanction_repo: Arc<SqliteSanctionRepository>,
    pub judge_client: Arc<HttpJudgeClient>,
    pub suggester: Arc<HttpQuestSuggester>,
}

impl AppContext {
    pub async fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        let pool = initialize_database(&config.database)
            .await
            .context("Failed to initialize database. Run `ascend init` first.")?;

        let judge_client = Arc::new(HttpJudgeClient::new(&config.judge)?);
        let suggester = Arc::new(HttpQuestSuggester::new(&config.suggester)?);

        Ok(Self {
            config,
            subject_repo: Arc::new(SqliteSubjectRepository::new(pool.clone())),
            attribute_repo: Arc::new(SqliteAttributeRepository::new(pool.clone())),
            task_repo: Arc::new(SqliteTaskRepository::new(pool.clone())),
            submission_repo: Arc::new(SqliteSubmissionRepository::new(pool.clone())),
            sanction_repo: Arc::new(SqliteSanctionRepository::new(pool)),
            judge_client,
            suggester,
        })
    }

    pub fn lifecycle(&self) -> AppLifecycle {
        TaskLifecycle::new(
            self.subject_repo.clone(),
            self.attribute_repo.clone(),
            self.task_repo.clone(),
            self.submission_repo.clone(),
            self.judge_client.clone(),
            self.suggester.clone(),
        )
    }

    pub fn orchestrator(&self) -> AppOrchestrator {
        Orchestrator::new(
            self.subject_repo.clone(),
            self.attribute_repo.clone(),
            self.task_repo.clone(),
            self.submission_repo.clone(),
            self.sanction_repo.clone(),
            self.judge_client.clone(),
            self.suggester.clone(),
        )
    }

    pub fn penalty_engine(&self) -> AppPenaltyEngine {
        PenaltyEngine::new(
            self.subject_repo.clone(),
            self.attribute_repo.clone(),
            self.submission_repo.clone(),
            self.sanction_repo.clone(),
        )
    }

    /// Resolve a subject by name, failing with a helpful message.
    pub async fn resolve_subject(&self, name: &str) -> Result<Subject> {
        self.subject_repo
            .get_by_name(name)
            .await?
            .with_context(|| format!("No subject named '{name}'. Run `ascend subject create {name}` first."))
    }
}

/// Parse a full or prefixed UUID from user input against a set of candidates.
pub(crate) fn resolve_id_prefix(input: &str, candidates: &[Uuid]) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    let matches: Vec<Uuid> = candidates
        .iter()
        .copied()
        .filter(|id| id.to_string().starts_with(input))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => anyhow::bail!("No ID matching '{input}'"),
        _ => anyhow::bail!("Ambiguous ID prefix '{input}' ({} matches)", matches.len()),
    }
}
