//! Dashboard configuration management

use anyhow::{Context, Result};
use espn_fetcher::EspnConfig;
use persistence::PersistenceConfig;
use scoring_engine::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Collection store configuration
    pub persistence: PersistenceConfig,

    /// Scoring rules
    pub scoring: ScoringConfig,

    /// ESPN score source
    pub espn: EspnConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, plain)
    pub format: String,

    /// Log file path (if None, logs to stderr)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string(), file: None }
    }
}

/// Load configuration from an optional TOML file, then environment variables.
///
/// The file comes from `config_file`, falling back to `DASHBOARD_CONFIG`. A
/// `data_dir` given on the command line wins over both.
pub fn load_config(config_file: Option<&Path>, data_dir: Option<PathBuf>) -> Result<DashboardConfig> {
    let env_file = std::env::var("DASHBOARD_CONFIG").ok().map(PathBuf::from);

    let mut config = match config_file.map(Path::to_path_buf).or(env_file) {
        Some(path) => load_from_file(&path)?,
        None => DashboardConfig::default(),
    };

    load_from_env(&mut config)?;

    if let Some(data_dir) = data_dir {
        config.persistence.data_dir = data_dir;
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> Result<DashboardConfig> {
    tracing::debug!("Loading configuration from file: {:?}", path);

    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Load configuration from environment variables
fn load_from_env(config: &mut DashboardConfig) -> Result<()> {
    if let Ok(data_dir) = std::env::var("DASHBOARD_DATA_DIR") {
        config.persistence.data_dir = PathBuf::from(data_dir);
    }

    if let Ok(level) = std::env::var("DASHBOARD_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(format) = std::env::var("DASHBOARD_LOG_FORMAT") {
        config.logging.format = format;
    }

    if let Ok(top_n) = std::env::var("DASHBOARD_TOP_N") {
        config.scoring.top_n = top_n.parse().with_context(|| format!("Invalid DASHBOARD_TOP_N: {top_n}"))?;
    }

    if let Ok(policy) = std::env::var("DASHBOARD_TIE_POLICY") {
        config.scoring.tie_policy = policy.parse().map_err(anyhow::Error::msg)?;
    }

    config.espn.apply_env_overrides()?;

    Ok(())
}

/// Validate configuration
fn validate_config(config: &DashboardConfig) -> Result<()> {
    config.persistence.validate().map_err(anyhow::Error::msg)?;
    config.scoring.validate().map_err(anyhow::Error::msg)?;
    config.espn.validate().map_err(anyhow::Error::msg)?;

    // Validate log level
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    // Validate log format
    match config.logging.format.as_str() {
        "json" | "pretty" | "plain" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    Ok(())
}
