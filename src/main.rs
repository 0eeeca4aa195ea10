//! Ascend CLI entry point.

use clap::Parser;

use ascend::cli::{Cli, Commands};
use ascend::infrastructure::config::ConfigLoader;
use ascend::infrastructure::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging follows the config file when present, defaults otherwise. Init
    // itself must work before any config exists.
    let logging_config = ConfigLoader::load()
        .map(|config| config.logging)
        .unwrap_or_default();
    if let Err(err) = logging::init(&logging_config) {
        eprintln!("Warning: {err}");
    }

    let result = match cli.command {
        Commands::Init(args) => ascend::cli::commands::init::execute(args, cli.json).await,
        Commands::Subject(args) => ascend::cli::commands::subject::execute(args, cli.json).await,
        Commands::Task(args) => ascend::cli::commands::task::execute(args, cli.json).await,
        Commands::Pipeline(args) => ascend::cli::commands::pipeline::execute(args, cli.json).await,
        Commands::Status(args) => ascend::cli::commands::status::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
