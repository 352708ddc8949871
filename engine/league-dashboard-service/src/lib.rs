//! League Dashboard Service Library
//!
//! Configuration, logging, refresh orchestration and the command line surface
//! for the Brown/Red league dashboard.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub mod cli;
pub mod config;
pub mod logging;
pub mod service;

pub use cli::{Cli, CliHandler, Commands};
pub use config::{DashboardConfig, LoggingConfig};
pub use logging::initialize_logging_with_config;
pub use service::{LeagueFeeds, RefreshReport, RefreshService};

/// Load configuration from files and environment variables
pub fn load_configuration(config_file: Option<&Path>, data_dir: Option<PathBuf>) -> Result<DashboardConfig> {
    config::load_config(config_file, data_dir).context("Failed to load dashboard configuration")
}
