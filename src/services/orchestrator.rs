//! Daily orchestration pipeline.
//!
//! One run sweeps every subject independently: judge near-deadline
//! submissions, apply decay, mark overdue submissions missed, apply the miss
//! penalty, and generate the next task. A step failure aborts the rest of
//! that subject's pipeline and is logged; it never touches other subjects.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::ports::{
    AttributeRepository, JudgeClient, QuestSuggester, SanctionRepository, SubjectRepository,
    SubmissionRepository, TaskRepository,
};
use crate::services::attribute_engine::AttributeEngine;
use crate::services::penalty::PenaltyEngine;
use crate::services::task_lifecycle::TaskLifecycle;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub subjects_processed: u64,
    pub subjects_failed: u64,
    pub submissions_auto_resolved: u64,
    pub submissions_missed: u64,
    pub penalties_applied: u64,
    pub tasks_generated: u64,
    pub sanctions_cleaned: u64,
}

pub struct Orchestrator<S, A, T, Sub, Sa, J, Q>
where
    S: SubjectRepository,
    A: AttributeRepository,
    T: TaskRepository,
    Sub: SubmissionRepository,
    Sa: SanctionRepository,
    J: JudgeClient,
    Q: QuestSuggester,
{
    subject_repo: Arc<S>,
    lifecycle: TaskLifecycle<S, A, T, Sub, J, Q>,
    attributes: AttributeEngine<A, Sub>,
    penalties: PenaltyEngine<S, A, Sub, Sa>,
}

impl<S, A, T, Sub, Sa, J, Q> Orchestrator<S, A, T, Sub, Sa, J, Q>
where
    S: SubjectRepository,
    A: AttributeRepository,
    T: TaskRepository,
    Sub: SubmissionRepository,
    Sa: SanctionRepository,
    J: JudgeClient,
    Q: QuestSuggester,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject_repo: Arc<S>,
        attribute_repo: Arc<A>,
        task_repo: Arc<T>,
        submission_repo: Arc<Sub>,
        sanction_repo: Arc<Sa>,
        judge_client: Arc<J>,
        suggester: Arc<Q>,
    ) -> Self {
        Self {
            lifecycle: TaskLifecycle::new(
                subject_repo.clone(),
                attribute_repo.clone(),
                task_repo,
                submission_repo.clone(),
                judge_client,
                suggester,
            ),
            attributes: AttributeEngine::new(attribute_repo.clone(), submission_repo.clone()),
            penalties: PenaltyEngine::new(
                subject_repo.clone(),
                attribute_repo,
                submission_repo,
                sanction_repo,
            ),
            subject_repo,
        }
    }

    /// Run the pipeline once over all subjects. The recurrence policy lives
    /// in the scheduler; this entry point is the whole orchestrator surface.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> DomainResult<PipelineReport> {
        let mut report = PipelineReport::default();

        // Expired sanctions are swept once per run, ahead of the subject loop.
        report.sanctions_cleaned = self.penalties.cleanup_expired_sanctions().await?;

        let subjects = self.subject_repo.list().await?;
        info!(subjects = subjects.len(), "pipeline run starting");

        for subject in subjects {
            match self.run_for_subject(subject.id, &mut report).await {
                Ok(()) => report.subjects_processed += 1,
                Err(err) => {
                    report.subjects_failed += 1;
                    error!(subject_id = %subject.id, error = %err, "subject pipeline failed, continuing with next subject");
                }
            }
        }

        info!(
            processed = report.subjects_processed,
            failed = report.subjects_failed,
            missed = report.submissions_missed,
            generated = report.tasks_generated,
            "pipeline run finished"
        );
        Ok(report)
    }

    /// The five pipeline steps for one subject, strictly in order. Each step
    /// persists only on success; a failure stops the remaining steps for this
    /// subject, and the next run converges from persisted state.
    async fn run_for_subject(
        &self,
        subject_id: Uuid,
        report: &mut PipelineReport,
    ) -> DomainResult<()> {
        // 1. Judge near-deadline submissions that carry evidence, so they are
        //    not lost to missed-marking while still judgeable.
        for submission in self.lifecycle.list_near_deadline(subject_id).await? {
            match self.lifecycle.judge_and_resolve(submission.id).await {
                Ok(_) => report.submissions_auto_resolved += 1,
                // A concurrent resolve can beat us here; skip, don't abort.
                Err(crate::domain::errors::DomainError::InvalidState(reason)) => {
                    warn!(submission_id = %submission.id, %reason, "skipping auto-resolve");
                }
                Err(err) => return Err(err),
            }
        }

        // 2. Daily decay (suppressed on compliance).
        self.attributes.apply_daily_decay(subject_id).await?;

        // 3. Mark overdue submissions missed.
        let missed = self.lifecycle.check_and_mark_missed(subject_id).await?;
        report.submissions_missed += missed.len() as u64;

        // 4. Penalty, only when this run marked something missed.
        if !missed.is_empty() {
            if let Some(outcome) = self.penalties.apply_miss_penalty(subject_id).await? {
                report.penalties_applied += 1;
                info!(subject_id = %subject_id, psi = outcome.psi, kind = outcome.kind.as_str(), "miss penalty applied");
            }
        }

        // 5. Generate the next task.
        self.lifecycle.generate(subject_id).await?;
        report.tasks_generated += 1;

        Ok(())
    }
}
