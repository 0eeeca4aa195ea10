//! Implementation of the `ascend init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json: bool) -> Result<()> {
    let config_dir = PathBuf::from(".ascend");
    let config_path = config_dir.join("config.yaml");

    if config_path.exists() && !args.force {
        output(
            &InitOutput {
                success: false,
                message: format!(
                    "Already initialized ({} exists). Use --force to overwrite.",
                    config_path.display()
                ),
                config_path,
                database_initialized: false,
            },
            json,
        );
        return Ok(());
    }

    fs::create_dir_all(&config_dir)
        .await
        .context("Failed to create .ascend directory")?;

    let config = Config::default();
    let rendered = serde_yaml_like(&config)?;
    fs::write(&config_path, rendered)
        .await
        .context("Failed to write config file")?;

    initialize_database(&config.database)
        .await
        .context("Failed to initialize database")?;

    output(
        &InitOutput {
            success: true,
            message: format!("Initialized ascend in {}", config_dir.display()),
            config_path,
            database_initialized: true,
        },
        json,
    );
    Ok(())
}

// The config file is small enough to render by hand; figment reads YAML but
// the crate carries no YAML serializer.
fn serde_yaml_like(config: &Config) -> Result<String> {
    Ok(format!(
        "database:\n  path: {}\n  max_connections: {}\n\
         logging:\n  level: {}\n  format: {}\n\
         judge:\n  enabled: {}\n  base_url: {}\n  timeout_secs: {}\n\
         suggester:\n  enabled: {}\n  base_url: {}\n  timeout_secs: {}\n\
         scheduler:\n  period_hours: {}\n",
        config.database.path,
        config.database.max_connections,
        config.logging.level,
        config.logging.format,
        config.judge.enabled,
        config.judge.base_url,
        config.judge.timeout_secs,
        config.suggester.enabled,
        config.suggester.base_url,
        config.suggester.timeout_secs,
        config.scheduler.period_hours,
    ))
}
