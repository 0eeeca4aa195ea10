use serde::{Deserialize, Serialize};

/// Main configuration structure for Ascend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Judge oracle configuration
    #[serde(default)]
    pub judge: JudgeConfig,

    /// Quest suggestion service configuration
    #[serde(default)]
    pub suggester: SuggesterConfig,

    /// Daily pipeline scheduling configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            judge: JudgeConfig::default(),
            suggester: SuggesterConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".ascend/ascend.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Judge oracle configuration. The oracle is advisory; when it is disabled,
/// unreachable, or slow, the deterministic fallback verdict is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JudgeConfig {
    /// Enable calls to the external judge oracle
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the judge service
    #[serde(default = "default_judge_url")]
    pub base_url: String,

    /// Request timeout in seconds; on timeout the fallback verdict applies
    #[serde(default = "default_judge_timeout")]
    pub timeout_secs: u64,
}

fn default_judge_url() -> String {
    "http://127.0.0.1:8700".to_string()
}

const fn default_judge_timeout() -> u64 {
    15
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_judge_url(),
            timeout_secs: default_judge_timeout(),
        }
    }
}

/// Quest suggestion service configuration. Suggestions are advisory; the
/// target attribute is always overridden and a fixed phrase list covers
/// suggester failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SuggesterConfig {
    /// Enable calls to the external quest suggester
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the suggestion service
    #[serde(default = "default_suggester_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_suggester_timeout")]
    pub timeout_secs: u64,
}

fn default_suggester_url() -> String {
    "http://127.0.0.1:8701".to_string()
}

const fn default_suggester_timeout() -> u64 {
    10
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_suggester_url(),
            timeout_secs: default_suggester_timeout(),
        }
    }
}

/// Daily pipeline scheduling configuration. The recurrence policy lives here,
/// not in the orchestrator: the orchestrator only exposes `run_once`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Period between pipeline runs, in hours
    #[serde(default = "default_period_hours")]
    pub period_hours: u64,
}

const fn default_period_hours() -> u64 {
    24
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period_hours: default_period_hours(),
        }
    }
}
