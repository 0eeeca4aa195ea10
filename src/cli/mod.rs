//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ascend")]
#[command(about = "Ascend - gamified real-life progression engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration and database
    Init(commands::init::InitArgs),

    /// Subject management commands
    Subject(commands::subject::SubjectArgs),

    /// Task lifecycle commands
    Task(commands::task::TaskArgs),

    /// Daily pipeline commands
    Pipeline(commands::pipeline::PipelineArgs),

    /// Show a subject's progression status
    Status(commands::status::StatusArgs),
}
