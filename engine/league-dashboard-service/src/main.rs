//! League dashboard entry point

use anyhow::{Context, Result};
use clap::Parser;
use espn_fetcher::{EspnConfig, EspnLeagueClient, SeasonCalendar};
use league_registry::League;
use persistence::{create_local_persistence_with_config, CollectionStore};
use scoring_engine::{LeagueStore, ScoringEngine};
use tracing::{debug, error, info};

use league_dashboard_service::{
    initialize_logging_with_config, load_configuration, Cli, CliHandler, LeagueFeeds, RefreshService,
};

fn build_feeds(config: &EspnConfig) -> Result<LeagueFeeds> {
    let brown = EspnLeagueClient::new(config, League::Brown).context("Failed to create Brown league client")?;
    let red = EspnLeagueClient::new(config, League::Red).context("Failed to create Red league client")?;
    LeagueFeeds::new(Box::new(brown), Box::new(red))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_configuration(cli.config.as_deref(), cli.data_dir.clone())?;
    let _log_guard = initialize_logging_with_config(&config.logging)?;

    info!("Starting league dashboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Data directory: {:?}", config.persistence.data_dir);

    let mut persistence = create_local_persistence_with_config(config.persistence.clone())
        .context("Failed to create collection store")?;
    persistence.initialize().await.context("Failed to initialize data directory")?;

    let engine = ScoringEngine::new(config.scoring.clone()).context("Invalid scoring configuration")?;
    let calendar = SeasonCalendar::new(&config.espn.calendar);
    let mut service = RefreshService::new(LeagueStore::new(persistence), engine, Box::new(calendar));

    match build_feeds(&config.espn) {
        Ok(feeds) => service = service.with_feeds(feeds),
        Err(e) if cli.command.needs_feeds() => return Err(e),
        Err(e) => debug!("League feeds unavailable: {:#}", e),
    }

    let handler = CliHandler::new(service, cli.json);
    if let Err(e) = handler.handle_command(cli.command).await {
        error!("Command failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
