//! Implementation of the `ascend status` command.

use anyhow::Result;
use clap::Args;
use console::style;

use crate::cli::commands::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::{rank_progress, xp_required, Attribute};
use crate::domain::ports::{AttributeRepository, SanctionRepository, SubmissionRepository};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Subject name
    pub subject: String,
}

#[derive(Debug, serde::Serialize)]
pub struct StatusOutput {
    pub name: String,
    pub rank: String,
    pub level: i64,
    pub total_xp: i64,
    pub rank_progress: f64,
    pub next_level_xp: i64,
    pub attributes: Vec<(String, i64)>,
    pub pending_submissions: usize,
    pub active_sanctions: Vec<String>,
    pub rank_locked: bool,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} — rank {} (level {}, {} XP)",
            style(&self.name).bold(),
            style(&self.rank).cyan(),
            self.level,
            self.total_xp
        )];
        lines.push(format!(
            "Rank progress: {:.1}%   Next level at {} XP",
            self.rank_progress, self.next_level_xp
        ));
        if self.rank_locked {
            lines.push(style("Rank is LOCKED by an active sanction").red().to_string());
        }

        let mut table = comfy_table::Table::new();
        table.set_header(["ATTRIBUTE", "VALUE"]);
        for (name, value) in &self.attributes {
            table.add_row([name.clone(), value.to_string()]);
        }
        lines.push(table.to_string());

        lines.push(format!("Pending submissions: {}", self.pending_submissions));
        if !self.active_sanctions.is_empty() {
            lines.push("Active sanctions:".to_string());
            for sanction in &self.active_sanctions {
                lines.push(format!("  - {sanction}"));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: StatusArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;
    let subject = ctx.resolve_subject(&args.subject).await?;

    let attributes = ctx
        .attribute_repo
        .get(subject.id)
        .await?
        .ok_or(DomainError::AttributeSetNotFound(subject.id))?;
    let pending = ctx
        .submission_repo
        .list_pending_for_subject(subject.id)
        .await?;
    let now = chrono::Utc::now();
    let sanctions = ctx.sanction_repo.list_for_subject(subject.id).await?;
    let active_sanctions: Vec<String> = sanctions
        .iter()
        .filter(|s| !s.is_expired(now))
        .map(|s| match s.expires_at {
            Some(expires) => format!(
                "{} (severity {}, expires {})",
                s.reason.as_str(),
                s.severity,
                expires.to_rfc3339()
            ),
            None => format!("{} (severity {})", s.reason.as_str(), s.severity),
        })
        .collect();
    let rank_locked = ctx.penalty_engine().is_rank_locked(subject.id).await?;

    output(
        &StatusOutput {
            name: subject.name.clone(),
            rank: subject.rank.as_str().to_string(),
            level: subject.level,
            total_xp: subject.total_xp,
            rank_progress: rank_progress(subject.total_xp),
            next_level_xp: xp_required(subject.level + 1),
            attributes: Attribute::ALL
                .into_iter()
                .map(|a| (a.as_str().to_string(), attributes.get(a)))
                .collect(),
            pending_submissions: pending.len(),
            active_sanctions,
            rank_locked,
        },
        json,
    );
    Ok(())
}
