//! Recurring pipeline execution.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::domain::models::SchedulerConfig;
use crate::domain::ports::{
    AttributeRepository, JudgeClient, QuestSuggester, SanctionRepository, SubjectRepository,
    SubmissionRepository, TaskRepository,
};
use crate::services::orchestrator::Orchestrator;

/// Runs the orchestrator on a fixed period until shutdown.
///
/// The first run fires immediately so a freshly started process converges
/// without waiting a full period.
pub struct PipelineScheduler<S, A, T, Sub, Sa, J, Q>
where
    S: SubjectRepository,
    A: AttributeRepository,
    T: TaskRepository,
    Sub: SubmissionRepository,
    Sa: SanctionRepository,
    J: JudgeClient,
    Q: QuestSuggester,
{
    orchestrator: Arc<Orchestrator<S, A, T, Sub, Sa, J, Q>>,
    period: Duration,
}

impl<S, A, T, Sub, Sa, J, Q> PipelineScheduler<S, A, T, Sub, Sa, J, Q>
where
    S: SubjectRepository + 'static,
    A: AttributeRepository + 'static,
    T: TaskRepository + 'static,
    Sub: SubmissionRepository + 'static,
    Sa: SanctionRepository + 'static,
    J: JudgeClient + 'static,
    Q: QuestSuggester + 'static,
{
    pub fn new(
        orchestrator: Arc<Orchestrator<S, A, T, Sub, Sa, J, Q>>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            orchestrator,
            period: Duration::from_secs(config.period_hours * 3600),
        }
    }

    /// Loop until ctrl-c. Errors from a run are logged, never fatal.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.period);
        info!(period_hours = self.period.as_secs() / 3600, "scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.orchestrator.run_once().await {
                        Ok(report) => info!(
                            processed = report.subjects_processed,
                            failed = report.subjects_failed,
                            "scheduled pipeline run complete"
                        ),
                        Err(err) => error!(error = %err, "scheduled pipeline run failed"),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received, stopping scheduler");
                    break;
                }
            }
        }
    }
}
