//! Daily pipeline CLI commands.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::commands::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::services::{PipelineReport, PipelineScheduler};

#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[command(subcommand)]
    pub command: PipelineCommands,
}

#[derive(Subcommand, Debug)]
pub enum PipelineCommands {
    /// Run the daily pipeline once and exit
    Run,
    /// Run the pipeline on its configured period until interrupted
    Start,
}

#[derive(Debug, serde::Serialize)]
pub struct PipelineOutput {
    pub report: PipelineReport,
}

impl CommandOutput for PipelineOutput {
    fn to_human(&self) -> String {
        let r = &self.report;
        format!(
            "Pipeline run complete: {} subject(s) processed, {} failed.\n\
             Auto-resolved {} submission(s), marked {} missed, applied {} penalt(ies),\n\
             generated {} task(s), cleaned {} expired sanction(s).",
            r.subjects_processed,
            r.subjects_failed,
            r.submissions_auto_resolved,
            r.submissions_missed,
            r.penalties_applied,
            r.tasks_generated,
            r.sanctions_cleaned,
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: PipelineArgs, json: bool) -> Result<()> {
    let ctx = AppContext::load().await?;

    match args.command {
        PipelineCommands::Run => {
            let report = ctx.orchestrator().run_once().await?;
            output(&PipelineOutput { report }, json);
        }
        PipelineCommands::Start => {
            let scheduler =
                PipelineScheduler::new(Arc::new(ctx.orchestrator()), &ctx.config.scheduler);
            scheduler.run().await;
        }
    }

    Ok(())
}
