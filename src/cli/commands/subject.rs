//! Subject CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::commands::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{rank_progress, AttributeSet, Subject};
use crate::domain::ports::{AttributeRepository, SubjectRepository};

#[derive(Args, Debug)]
pub struct SubjectArgs {
    #[command(subcommand)]
    pub command: SubjectCommands,
}

#[derive(Subcommand, Debug)]
pub enum SubjectCommands {
    /// Register a new subject
    Create {
        /// Subject name (unique)
        name: String,
    },
    /// List all subjects
    List,
}

#[derive(Debug, serde::Serialize)]
pub struct SubjectOutput {
    pub id: String,
    pub name: String,
    pub rank: String,
    pub level: i64,
    pub total_xp: i64,
    pub rank_progress: f64,
}

impl From<&Subject> for SubjectOutput {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id.to_string(),
            name: subject.name.clone(),
            rank: subject.rank.as_str().to_string(),
            level: subject.level,
            total_xp: subject.total_xp,
            rank_progress: rank_progress(subject.total_xp),
        }
    }
}

impl CommandOutput for SubjectOutput {
    fn to_human(&self) -> String {
        format!(
            "Subject '{}' (rank {}, level {}, {} XP)",
            self.name, self.rank, self.level, self.total_xp
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SubjectListOutput {
    pub subjects: Vec<SubjectOutput>,
    pub total: usize,
}

impl CommandOutput for SubjectListOutput {
    fn to_human(&self) -> String {
        if self.subjects.is_empty() {
            return "No subjects registered.".to_string();
        }

        let mut table = comfy_table::Table::new();
        table.set_header(["NAME", "RANK", "LEVEL", "XP", "PROGRESS"]);
        for subject in &self.subjects {
            table.add_row([
                subject.name.clone(),
                subject.rank.clone(),
                subject.level.to_string(),
                subject.total_xp.to_string(),
                format!("{:.1}%", subject.rank_progress),
            ]);
        }
        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SubjectArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;

    match args.command {
        SubjectCommands::Create { name } => {
            if ctx.subject_repo.get_by_name(&name).await?.is_some() {
                anyhow::bail!("Subject '{name}' already exists");
            }
            let subject = Subject::new(&name);
            subject.validate()?;
            ctx.subject_repo.create(&subject).await?;
            ctx.attribute_repo
                .create(&AttributeSet::new(subject.id))
                .await?;
            output(&SubjectOutput::from(&subject), json);
        }
        SubjectCommands::List => {
            let subjects = ctx.subject_repo.list().await?;
            output(
                &SubjectListOutput {
                    total: subjects.len(),
                    subjects: subjects.iter().map(SubjectOutput::from).collect(),
                },
                json,
            );
        }
    }

    Ok(())
}
