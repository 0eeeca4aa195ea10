//! Task lifecycle: generation, submission, and resolution.
//!
//! This is the only service permitted to turn verdicts into state: it calls
//! the progression service and attribute engine on success. The judge contract
//! hands it a validated verdict and nothing else.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Attribute, AttributeSet, Difficulty, Rank, Submission, SubmissionStatus, Task, TaskKind,
    Verdict,
};
use crate::domain::ports::{
    AttributeRepository, JudgeClient, QuestSuggester, SubjectRepository, SubmissionRepository,
    SuggestionRequest, TaskRepository,
};
use crate::services::attribute_engine::AttributeEngine;
use crate::services::judge_contract::JudgeContract;
use crate::services::progression::ProgressionService;

/// Trailing window for the difficulty-scaling failure count.
const FAILURE_WINDOW_DAYS: i64 = 21;

/// Base XP roll, before the difficulty multiplier.
const REWARD_BASE_MIN: f64 = 20.0;
const REWARD_BASE_MAX: f64 = 60.0;

/// Stored comment when a verdict somehow carries none.
const DEFAULT_SUCCESS_COMMENT: &str = "Task verified and completed.";
const DEFAULT_FAIL_COMMENT: &str = "Task judged unsuccessful.";

/// Fixed per-attribute descriptions used when the quest suggester is
/// unavailable.
fn fallback_descriptions(attr: Attribute) -> &'static [&'static str] {
    match attr {
        Attribute::Physical => &[
            "Complete a 30-minute workout",
            "Go for a 5km run",
            "Do 50 push-ups across the day",
        ],
        Attribute::Intelligence => &[
            "Read 20 pages of a non-fiction book",
            "Complete one lesson of a course you are taking",
            "Write a one-page summary of something you learned today",
        ],
        Attribute::Discipline => &[
            "Plan tomorrow in writing before going to bed",
            "Spend 25 focused minutes on your hardest pending chore",
            "No social media until every planned task is done",
        ],
        Attribute::Charisma => &[
            "Start a conversation with someone you rarely talk to",
            "Give one person genuine, specific praise",
            "Call a friend or family member you have not spoken to in a while",
        ],
        Attribute::Confidence => &[
            "Do one thing today that you have been putting off out of doubt",
            "Speak up at least once in a group setting",
            "Record yourself explaining a topic for two minutes",
        ],
        Attribute::Creativity => &[
            "Sketch, write, or compose something for 20 minutes",
            "Brainstorm ten ideas on a problem that bugs you",
            "Rework something ordinary in an unusual way and note the result",
        ],
    }
}

/// Rank-scaled difficulty when the subject has no recent failures.
fn difficulty_for_rank(rank: Rank) -> Difficulty {
    match rank {
        Rank::E | Rank::D => Difficulty::Easy,
        Rank::C | Rank::B => Difficulty::Medium,
        Rank::A => Difficulty::Hard,
        Rank::S | Rank::Ss => Difficulty::Extreme,
    }
}

/// Difficulty-scaling policy keyed by failed/missed submissions in the
/// trailing 21 days.
fn scale_difficulty(rank: Rank, recent_failures: i64) -> Difficulty {
    match recent_failures {
        0 => difficulty_for_rank(rank),
        1 | 2 => difficulty_for_rank(rank).min(Difficulty::Medium),
        _ => Difficulty::Easy,
    }
}

pub struct TaskLifecycle<S, A, T, Sub, J, Q>
where
    S: SubjectRepository,
    A: AttributeRepository,
    T: TaskRepository,
    Sub: SubmissionRepository,
    J: JudgeClient,
    Q: QuestSuggester,
{
    subject_repo: Arc<S>,
    attribute_repo: Arc<A>,
    task_repo: Arc<T>,
    submission_repo: Arc<Sub>,
    progression: ProgressionService<S>,
    attributes: AttributeEngine<A, Sub>,
    judge: JudgeContract<J>,
    suggester: Arc<Q>,
}

impl<S, A, T, Sub, J, Q> TaskLifecycle<S, A, T, Sub, J, Q>
where
    S: SubjectRepository,
    A: AttributeRepository,
    T: TaskRepository,
    Sub: SubmissionRepository,
    J: JudgeClient,
    Q: QuestSuggester,
{
    pub fn new(
        subject_repo: Arc<S>,
        attribute_repo: Arc<A>,
        task_repo: Arc<T>,
        submission_repo: Arc<Sub>,
        judge_client: Arc<J>,
        suggester: Arc<Q>,
    ) -> Self {
        Self {
            progression: ProgressionService::new(subject_repo.clone()),
            attributes: AttributeEngine::new(attribute_repo.clone(), submission_repo.clone()),
            judge: JudgeContract::new(judge_client),
            subject_repo,
            attribute_repo,
            task_repo,
            submission_repo,
            suggester,
        }
    }

    /// Generate the next task for a subject, targeting their weakest
    /// attribute, and open its initial pending submission.
    pub async fn generate(&self, subject_id: Uuid) -> DomainResult<(Task, Submission)> {
        let subject = self
            .subject_repo
            .get(subject_id)
            .await?
            .ok_or(DomainError::SubjectNotFound(subject_id))?;
        let attributes = self
            .attribute_repo
            .get(subject_id)
            .await?
            .ok_or(DomainError::AttributeSetNotFound(subject_id))?;

        // Weakness targeting is mandatory: whatever the suggester proposes,
        // the target stays the computed weakest attribute.
        let target = attributes.weakest();

        let since = Utc::now() - Duration::days(FAILURE_WINDOW_DAYS);
        let recent_failures = self
            .submission_repo
            .count_recent_failures(subject_id, since)
            .await?;
        let difficulty = scale_difficulty(subject.rank, recent_failures);

        let (kind, description) = self
            .suggest_quest(&attributes, recent_failures, subject.rank, target, difficulty)
            .await;

        let xp_reward = roll_reward(difficulty);
        let deadline = end_of_day(Utc::now());

        let task = Task::new(
            subject_id, kind, difficulty, description, target, xp_reward, deadline,
        );
        self.task_repo.create(&task).await?;

        let submission = Submission::new(task.id, subject_id, None);
        self.submission_repo.create(&submission).await?;

        info!(
            subject_id = %subject_id,
            task_id = %task.id,
            target = %target,
            difficulty = %task.difficulty.as_str(),
            xp_reward,
            "task generated"
        );

        Ok((task, submission))
    }

    async fn suggest_quest(
        &self,
        attributes: &AttributeSet,
        recent_failures: i64,
        rank: Rank,
        target: Attribute,
        difficulty: Difficulty,
    ) -> (TaskKind, String) {
        let request = SuggestionRequest {
            attributes: attributes
                .iter()
                .map(|(a, v)| (a.as_str().to_string(), v))
                .collect(),
            recent_failure_count: recent_failures,
            rank: rank.as_str().to_string(),
            target_attribute: target.as_str().to_string(),
            desired_difficulty: difficulty.as_str().to_string(),
        };

        match self.suggester.suggest(&request).await {
            Ok(suggestion) if !suggestion.description.trim().is_empty() => {
                let kind = suggestion
                    .kind
                    .as_deref()
                    .and_then(TaskKind::from_str)
                    .unwrap_or_default();
                (kind, suggestion.description)
            }
            Ok(_) => {
                warn!(target = %target, "suggester returned empty description, using phrase list");
                (TaskKind::Daily, pick_fallback_description(target))
            }
            Err(err) => {
                warn!(target = %target, error = %err, "suggester unavailable, using phrase list");
                (TaskKind::Daily, pick_fallback_description(target))
            }
        }
    }

    /// Submit evidence for a task. Idempotent against an existing pending
    /// submission: evidence is attached if missing and the submission is
    /// returned as-is, never duplicated.
    pub async fn submit(
        &self,
        task_id: Uuid,
        subject_id: Uuid,
        evidence: impl Into<String>,
    ) -> DomainResult<Submission> {
        let task = self
            .task_repo
            .get(task_id)
            .await?
            .ok_or(DomainError::TaskNotFound(task_id))?;

        if task.is_overdue(Utc::now()) {
            return Err(DomainError::InvalidState("deadline passed".to_string()));
        }

        let evidence = evidence.into();

        if let Some(mut existing) = self
            .submission_repo
            .get_pending_for_task(task_id, subject_id)
            .await?
        {
            if existing.evidence.is_none() {
                existing.evidence = Some(evidence);
                existing.updated_at = Utc::now();
                self.submission_repo.update(&existing).await?;
            }
            return Ok(existing);
        }

        let submission = Submission::new(task_id, subject_id, Some(evidence));
        self.submission_repo.create(&submission).await?;
        Ok(submission)
    }

    /// Apply a validated verdict to a pending submission. On success only,
    /// XP is credited and attribute deltas applied.
    pub async fn resolve_with_verdict(
        &self,
        mut submission: Submission,
        verdict: &Verdict,
    ) -> DomainResult<Submission> {
        let new_status = if verdict.is_success() {
            SubmissionStatus::Completed
        } else {
            SubmissionStatus::Failed
        };

        submission
            .transition_to(new_status)
            .map_err(|_| DomainError::InvalidStateTransition {
                from: submission.status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            })?;

        submission.verdict_comment = Some(if verdict.comment.trim().is_empty() {
            match new_status {
                SubmissionStatus::Completed => DEFAULT_SUCCESS_COMMENT.to_string(),
                _ => DEFAULT_FAIL_COMMENT.to_string(),
            }
        } else {
            verdict.comment.clone()
        });

        self.submission_repo.update(&submission).await?;

        if verdict.is_success() {
            self.progression
                .add_xp(submission.subject_id, verdict.xp)
                .await?;
            if !verdict.attribute_deltas.is_empty() {
                let deltas: HashMap<Attribute, f64> = verdict
                    .attribute_deltas
                    .iter()
                    .map(|(a, d)| (*a, *d as f64))
                    .collect();
                self.attributes
                    .apply_delta(submission.subject_id, &deltas)
                    .await?;
            }
        }

        info!(
            submission_id = %submission.id,
            status = %submission.status.as_str(),
            xp = verdict.xp,
            "submission resolved"
        );

        Ok(submission)
    }

    /// Judge a pending submission's evidence through the contract, then
    /// resolve it. The contract always yields a verdict, so the only failure
    /// modes here are missing entities and invalid submission state.
    pub async fn judge_and_resolve(&self, submission_id: Uuid) -> DomainResult<Submission> {
        let submission = self
            .submission_repo
            .get(submission_id)
            .await?
            .ok_or(DomainError::SubmissionNotFound(submission_id))?;

        if submission.status != SubmissionStatus::Pending {
            return Err(DomainError::InvalidState(format!(
                "submission is {}, not pending",
                submission.status.as_str()
            )));
        }
        let Some(evidence) = submission.evidence.clone() else {
            return Err(DomainError::InvalidState(
                "submission has no evidence to judge".to_string(),
            ));
        };

        let task = self
            .task_repo
            .get(submission.task_id)
            .await?
            .ok_or(DomainError::TaskNotFound(submission.task_id))?;
        let attributes = self
            .attribute_repo
            .get(submission.subject_id)
            .await?
            .ok_or(DomainError::AttributeSetNotFound(submission.subject_id))?;

        let verdict = self.judge.evaluate(&task, &attributes, &evidence).await;
        self.resolve_with_verdict(submission, &verdict).await
    }

    /// Transition every pending submission whose task deadline has passed to
    /// missed; returns the affected set.
    pub async fn check_and_mark_missed(&self, subject_id: Uuid) -> DomainResult<Vec<Submission>> {
        let now = Utc::now();
        let pending = self
            .submission_repo
            .list_pending_for_subject(subject_id)
            .await?;

        let mut missed = Vec::new();
        for mut submission in pending {
            let task = self
                .task_repo
                .get(submission.task_id)
                .await?
                .ok_or(DomainError::TaskNotFound(submission.task_id))?;
            if !task.is_overdue(now) {
                continue;
            }
            submission
                .transition_to(SubmissionStatus::Missed)
                .map_err(|_| DomainError::InvalidStateTransition {
                    from: submission.status.as_str().to_string(),
                    to: SubmissionStatus::Missed.as_str().to_string(),
                })?;
            self.submission_repo.update(&submission).await?;
            missed.push(submission);
        }

        if !missed.is_empty() {
            info!(subject_id = %subject_id, count = missed.len(), "submissions marked missed");
        }
        Ok(missed)
    }

    /// Pending submissions that carry evidence and whose deadline falls within
    /// the next hour. The orchestrator judges these before missed-marking so
    /// they are not lost while still judgeable.
    pub async fn list_near_deadline(&self, subject_id: Uuid) -> DomainResult<Vec<Submission>> {
        let now = Utc::now();
        let cutoff = now + Duration::hours(1);
        let pending = self
            .submission_repo
            .list_pending_for_subject(subject_id)
            .await?;

        let mut near = Vec::new();
        for submission in pending {
            if submission.evidence.is_none() {
                continue;
            }
            let task = self
                .task_repo
                .get(submission.task_id)
                .await?
                .ok_or(DomainError::TaskNotFound(submission.task_id))?;
            if task.deadline <= cutoff && !task.is_overdue(now) {
                near.push(submission);
            }
        }
        Ok(near)
    }
}

fn roll_reward(difficulty: Difficulty) -> i64 {
    let base = rand::thread_rng().gen_range(REWARD_BASE_MIN..=REWARD_BASE_MAX);
    (base * difficulty.multiplier()).round() as i64
}

fn pick_fallback_description(target: Attribute) -> String {
    let phrases = fallback_descriptions(target);
    phrases
        .choose(&mut rand::thread_rng())
        .expect("phrase lists are non-empty")
        .to_string()
}

/// Last second of the current UTC calendar day.
fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(23, 59, 59)
        .expect("valid end of day")
        .and_utc()
}
