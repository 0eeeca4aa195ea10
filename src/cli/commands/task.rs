//! Task lifecycle CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::commands::{resolve_id_prefix, AppContext};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Submission, Task};
use crate::domain::ports::{SubmissionRepository, TaskRepository};

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Generate the next task for a subject
    Generate {
        /// Subject name
        subject: String,
    },
    /// Submit evidence for a task
    Submit {
        /// Subject name
        subject: String,
        /// Task ID (full or prefix)
        task_id: String,
        /// Evidence of completion
        evidence: String,
    },
    /// Judge and resolve a pending submission
    Judge {
        /// Subject name
        subject: String,
        /// Submission ID (full or prefix)
        submission_id: String,
    },
    /// List a subject's recent tasks
    List {
        /// Subject name
        subject: String,
        /// Maximum number of tasks to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct TaskOutput {
    pub id: String,
    pub kind: String,
    pub difficulty: String,
    pub description: String,
    pub target_attribute: String,
    pub xp_reward: i64,
    pub deadline: String,
}

impl From<&Task> for TaskOutput {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            kind: task.kind.as_str().to_string(),
            difficulty: task.difficulty.as_str().to_string(),
            description: task.description.clone(),
            target_attribute: task.target_attribute.as_str().to_string(),
            xp_reward: task.xp_reward,
            deadline: task.deadline.to_rfc3339(),
        }
    }
}

impl CommandOutput for TaskOutput {
    fn to_human(&self) -> String {
        format!(
            "[{}] {} ({}, targets {}, {} XP, due {})",
            &self.id[..8],
            self.description,
            self.difficulty,
            self.target_attribute,
            self.xp_reward,
            self.deadline
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SubmissionOutput {
    pub id: String,
    pub task_id: String,
    pub status: String,
    pub verdict_comment: Option<String>,
}

impl From<&Submission> for SubmissionOutput {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id.to_string(),
            task_id: submission.task_id.to_string(),
            status: submission.status.as_str().to_string(),
            verdict_comment: submission.verdict_comment.clone(),
        }
    }
}

impl CommandOutput for SubmissionOutput {
    fn to_human(&self) -> String {
        match &self.verdict_comment {
            Some(comment) => format!(
                "Submission {} is {}: {}",
                &self.id[..8],
                self.status,
                comment
            ),
            None => format!("Submission {} is {}", &self.id[..8], self.status),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TaskListOutput {
    pub tasks: Vec<TaskOutput>,
    pub total: usize,
}

impl CommandOutput for TaskListOutput {
    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks yet.".to_string();
        }

        let mut table = comfy_table::Table::new();
        table.set_header(["ID", "DESCRIPTION", "DIFFICULTY", "TARGET", "XP", "DEADLINE"]);
        for task in &self.tasks {
            table.add_row([
                task.id[..8].to_string(),
                truncate(&task.description, 40),
                task.difficulty.clone(),
                task.target_attribute.clone(),
                task.xp_reward.to_string(),
                task.deadline.clone(),
            ]);
        }
        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: TaskArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;
    let lifecycle = ctx.lifecycle();

    match args.command {
        TaskCommands::Generate { subject } => {
            let subject = ctx.resolve_subject(&subject).await?;
            let (task, _submission) = lifecycle.generate(subject.id).await?;
            output(&TaskOutput::from(&task), json);
        }
        TaskCommands::Submit {
            subject,
            task_id,
            evidence,
        } => {
            let subject = ctx.resolve_subject(&subject).await?;
            let candidates: Vec<_> = ctx
                .task_repo
                .list_for_subject(subject.id, 50)
                .await?
                .iter()
                .map(|t| t.id)
                .collect();
            let task_id = resolve_id_prefix(&task_id, &candidates)?;
            let submission = lifecycle.submit(task_id, subject.id, evidence).await?;
            output(&SubmissionOutput::from(&submission), json);
        }
        TaskCommands::Judge {
            subject,
            submission_id,
        } => {
            let subject = ctx.resolve_subject(&subject).await?;
            let candidates: Vec<_> = ctx
                .submission_repo
                .list_pending_for_subject(subject.id)
                .await?
                .iter()
                .map(|s| s.id)
                .collect();
            let submission_id = resolve_id_prefix(&submission_id, &candidates)?;
            let resolved = lifecycle.judge_and_resolve(submission_id).await?;
            output(&SubmissionOutput::from(&resolved), json);
        }
        TaskCommands::List { subject, limit } => {
            let subject = ctx.resolve_subject(&subject).await?;
            let tasks = ctx.task_repo.list_for_subject(subject.id, limit).await?;
            output(
                &TaskListOutput {
                    total: tasks.len(),
                    tasks: tasks.iter().map(TaskOutput::from).collect(),
                },
                json,
            );
        }
    }

    Ok(())
}
