//! End-to-end tests for the progression pipeline: subject registration
//! through task generation, submission, judging, and penalty handling,
//! running against an in-memory database with stubbed collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use ascend::adapters::sqlite::{
    create_migrated_test_pool, SqliteAttributeRepository, SqliteSanctionRepository,
    SqliteSubjectRepository, SqliteSubmissionRepository, SqliteTaskRepository,
};
use ascend::domain::models::{
    Attribute, AttributeSet, JudgeRequest, RawJudgeResponse, Rank, Subject, Submission,
    SubmissionStatus, Task, FALLBACK_COMMENT,
};
use ascend::domain::ports::{
    AttributeRepository, JudgeClient, JudgeError, QuestSuggester, QuestSuggestion,
    SanctionRepository, SubjectRepository, SubmissionRepository, SuggestionRequest, TaskRepository,
};
use ascend::services::{Orchestrator, TaskLifecycle};

/// Oracle that is always unreachable, forcing the deterministic fallback.
struct OfflineJudge;

#[async_trait]
impl JudgeClient for OfflineJudge {
    async fn judge(&self, _request: &JudgeRequest) -> Result<RawJudgeResponse, JudgeError> {
        Err(JudgeError::Transport("connection refused".to_string()))
    }
}

/// Oracle that returns a fixed, valid verdict.
struct CannedJudge {
    outcome: &'static str,
    xp: i64,
    deltas: serde_json::Value,
}

#[async_trait]
impl JudgeClient for CannedJudge {
    async fn judge(&self, _request: &JudgeRequest) -> Result<RawJudgeResponse, JudgeError> {
        Ok(RawJudgeResponse {
            outcome: serde_json::json!(self.outcome),
            xp: serde_json::json!(self.xp),
            attribute_deltas: self.deltas.clone(),
            comment: serde_json::json!("canned verdict"),
        })
    }
}

struct OfflineSuggester;

#[async_trait]
impl QuestSuggester for OfflineSuggester {
    async fn suggest(&self, _request: &SuggestionRequest) -> Result<QuestSuggestion, JudgeError> {
        Err(JudgeError::Transport("connection refused".to_string()))
    }
}

struct World {
    subject_repo: Arc<SqliteSubjectRepository>,
    attribute_repo: Arc<SqliteAttributeRepository>,
    task_repo: Arc<SqliteTaskRepository>,
    submission_repo: Arc<SqliteSubmissionRepository>,
    sanction_repo: Arc<SqliteSanctionRepository>,
}

impl World {
    async fn new() -> Self {
        let pool = create_migrated_test_pool().await.unwrap();
        Self {
            subject_repo: Arc::new(SqliteSubjectRepository::new(pool.clone())),
            attribute_repo: Arc::new(SqliteAttributeRepository::new(pool.clone())),
            task_repo: Arc::new(SqliteTaskRepository::new(pool.clone())),
            submission_repo: Arc::new(SqliteSubmissionRepository::new(pool.clone())),
            sanction_repo: Arc::new(SqliteSanctionRepository::new(pool)),
        }
    }

    fn lifecycle<J: JudgeClient>(
        &self,
        judge: J,
    ) -> TaskLifecycle<
        SqliteSubjectRepository,
        SqliteAttributeRepository,
        SqliteTaskRepository,
        SqliteSubmissionRepository,
        J,
        OfflineSuggester,
    > {
        TaskLifecycle::new(
            self.subject_repo.clone(),
            self.attribute_repo.clone(),
            self.task_repo.clone(),
            self.submission_repo.clone(),
            Arc::new(judge),
            Arc::new(OfflineSuggester),
        )
    }

    async fn add_subject(&self, name: &str, weakest: Attribute, value: i64) -> Subject {
        let subject = Subject::new(name);
        self.subject_repo.create(&subject).await.unwrap();
        let mut attributes = AttributeSet::new(subject.id);
        attributes.set(weakest, value);
        self.attribute_repo.create(&attributes).await.unwrap();
        subject
    }
}

#[tokio::test]
async fn test_full_cycle_with_fallback_judge() {
    let world = World::new().await;
    let subject = world.add_subject("runner", Attribute::Physical, 30).await;
    let lifecycle = world.lifecycle(OfflineJudge);

    // Generation targets the weakest attribute regardless of suggester.
    let (task, submission) = lifecycle.generate(subject.id).await.unwrap();
    assert_eq!(task.target_attribute, Attribute::Physical);
    assert_eq!(submission.status, SubmissionStatus::Pending);

    let submitted = lifecycle
        .submit(task.id, subject.id, "gps trace attached")
        .await
        .unwrap();
    assert_eq!(submitted.id, submission.id);

    // Unreachable oracle: deterministic fallback grants success.
    let resolved = lifecycle.judge_and_resolve(submission.id).await.unwrap();
    assert_eq!(resolved.status, SubmissionStatus::Completed);
    assert_eq!(resolved.verdict_comment.as_deref(), Some(FALLBACK_COMMENT));

    let attributes = world.attribute_repo.get(subject.id).await.unwrap().unwrap();
    assert_eq!(attributes.get(Attribute::Physical), 31);

    let updated = world.subject_repo.get(subject.id).await.unwrap().unwrap();
    assert_eq!(updated.total_xp, task.difficulty.fallback_xp());
}

#[tokio::test]
async fn test_canned_success_verdict_applies_xp_and_deltas() {
    let world = World::new().await;
    let subject = world.add_subject("writer", Attribute::Creativity, 20).await;
    let lifecycle = world.lifecycle(CannedJudge {
        outcome: "success",
        xp: 150,
        deltas: serde_json::json!({"creativity": 2, "discipline": 1}),
    });

    let (task, submission) = lifecycle.generate(subject.id).await.unwrap();
    assert_eq!(task.target_attribute, Attribute::Creativity);
    lifecycle
        .submit(task.id, subject.id, "draft chapter attached")
        .await
        .unwrap();
    let resolved = lifecycle.judge_and_resolve(submission.id).await.unwrap();
    assert_eq!(resolved.status, SubmissionStatus::Completed);
    assert_eq!(resolved.verdict_comment.as_deref(), Some("canned verdict"));

    let updated = world.subject_repo.get(subject.id).await.unwrap().unwrap();
    assert_eq!(updated.total_xp, 150);
    assert_eq!(updated.level, 1);
    assert_eq!(updated.rank, Rank::E);

    let attributes = world.attribute_repo.get(subject.id).await.unwrap().unwrap();
    assert_eq!(attributes.get(Attribute::Creativity), 22);
    assert_eq!(attributes.get(Attribute::Discipline), 51);
}

#[tokio::test]
async fn test_fail_verdict_grants_nothing() {
    let world = World::new().await;
    let subject = world.add_subject("slacker", Attribute::Discipline, 10).await;
    let lifecycle = world.lifecycle(CannedJudge {
        outcome: "fail",
        xp: 500,
        deltas: serde_json::json!({"discipline": 5}),
    });

    let (task, submission) = lifecycle.generate(subject.id).await.unwrap();
    lifecycle
        .submit(task.id, subject.id, "unconvincing screenshot")
        .await
        .unwrap();
    let resolved = lifecycle.judge_and_resolve(submission.id).await.unwrap();
    assert_eq!(resolved.status, SubmissionStatus::Failed);

    // A failed verdict never pays out, whatever the oracle claims.
    let updated = world.subject_repo.get(subject.id).await.unwrap().unwrap();
    assert_eq!(updated.total_xp, 0);
    let attributes = world.attribute_repo.get(subject.id).await.unwrap().unwrap();
    assert_eq!(attributes.get(Attribute::Discipline), 10);
}

#[tokio::test]
async fn test_orchestrated_miss_applies_sanction_and_regenerates() {
    let world = World::new().await;
    let subject = world.add_subject("ghost", Attribute::Charisma, 40).await;
    let lifecycle = world.lifecycle(OfflineJudge);

    // Plant an already-overdue task with a pending submission alongside the
    // freshly generated one.
    let (task, _submission) = lifecycle.generate(subject.id).await.unwrap();
    let overdue = Task::new(
        subject.id,
        task.kind,
        task.difficulty,
        "stale chore",
        task.target_attribute,
        task.xp_reward,
        Utc::now() - Duration::hours(3),
    );
    world.task_repo.create(&overdue).await.unwrap();
    world
        .submission_repo
        .create(&Submission::new(overdue.id, subject.id, None))
        .await
        .unwrap();

    let orchestrator = Orchestrator::new(
        world.subject_repo.clone(),
        world.attribute_repo.clone(),
        world.task_repo.clone(),
        world.submission_repo.clone(),
        world.sanction_repo.clone(),
        Arc::new(OfflineJudge),
        Arc::new(OfflineSuggester),
    );
    let report = orchestrator.run_once().await.unwrap();
    assert_eq!(report.subjects_processed, 1);
    assert_eq!(report.submissions_missed, 1);
    assert_eq!(report.penalties_applied, 1);

    // A sanction now exists and a fresh task was generated.
    let sanctions = world.sanction_repo.list_for_subject(subject.id).await.unwrap();
    assert!(!sanctions.is_empty());
    let pending = world
        .submission_repo
        .list_pending_for_subject(subject.id)
        .await
        .unwrap();
    assert!(!pending.is_empty());
}

#[tokio::test]
async fn test_decay_suppressed_after_completion() {
    let world = World::new().await;
    let subject = world.add_subject("steady", Attribute::Physical, 60).await;
    let lifecycle = world.lifecycle(OfflineJudge);

    // Complete today's task, then run the pipeline: no decay should land.
    let (task, submission) = lifecycle.generate(subject.id).await.unwrap();
    lifecycle
        .submit(task.id, subject.id, "evidence")
        .await
        .unwrap();
    lifecycle.judge_and_resolve(submission.id).await.unwrap();

    let before = world.attribute_repo.get(subject.id).await.unwrap().unwrap();

    let orchestrator = Orchestrator::new(
        world.subject_repo.clone(),
        world.attribute_repo.clone(),
        world.task_repo.clone(),
        world.submission_repo.clone(),
        world.sanction_repo.clone(),
        Arc::new(OfflineJudge),
        Arc::new(OfflineSuggester),
    );
    orchestrator.run_once().await.unwrap();

    let after = world.attribute_repo.get(subject.id).await.unwrap().unwrap();
    let before_values: HashMap<Attribute, i64> = before.iter().collect();
    for (attribute, value) in after.iter() {
        assert_eq!(value, before_values[&attribute], "{attribute:?} decayed despite compliance");
    }
}
