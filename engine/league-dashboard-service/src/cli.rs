//! # Command Line Interface
//!
//! Refresh, scoreboard, rankings, standings and pairing commands.

use crate::service::{RefreshReport, RefreshService};
use anyhow::Result;
use clap::{Parser, Subcommand};
use league_registry::League;
use persistence::CollectionStore;
use scoring_engine::views::{GameResult, LiveGame, RankedScore};
use scoring_engine::{Period, SeasonStandingsRow};
use serde::Serialize;
use std::path::PathBuf;

/// Brown/Red league dashboard
#[derive(Parser)]
#[command(name = "league-dashboard")]
#[command(about = "Scores and standings for the Brown and Red fantasy leagues")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored collections
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Score a week and record it once it is closed
    Refresh {
        /// Week to refresh (defaults to the current week)
        #[arg(long, value_parser = clap::value_parser!(Period).range(1..))]
        period: Option<Period>,
    },
    /// Show the intra-league scoreboard without recording anything
    Live {
        #[arg(long, value_parser = clap::value_parser!(Period).range(1..))]
        period: Option<Period>,
    },
    /// Rank a week's scores across both leagues or within one
    Rankings {
        #[arg(long, value_parser = clap::value_parser!(Period).range(1..))]
        period: Option<Period>,
        /// brown or red
        #[arg(long)]
        league: Option<League>,
    },
    /// Show season standings from recorded weeks
    Standings {
        #[arg(long)]
        league: Option<League>,
    },
    /// Pair a Brown team with a Red team for cross-league games
    Pair {
        /// Brown team display name
        brown: String,
        /// Red team display name
        red: String,
        /// Limit the pairing to one week (season-wide when omitted)
        #[arg(long, value_parser = clap::value_parser!(Period).range(1..))]
        period: Option<Period>,
    },
    /// Print the current week
    CurrentPeriod,
}

impl Commands {
    /// Whether the command cannot run without the league feeds
    pub fn needs_feeds(&self) -> bool {
        matches!(self, Commands::Refresh { .. } | Commands::Live { .. } | Commands::Rankings { .. })
    }
}

/// CLI handler
pub struct CliHandler<S> {
    service: RefreshService<S>,
    json: bool,
}

impl<S: CollectionStore> CliHandler<S> {
    pub fn new(service: RefreshService<S>, json: bool) -> Self {
        Self { service, json }
    }

    /// Print `value` as JSON when requested, otherwise the rendered table
    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", table());
        }
        Ok(())
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Refresh { period } => {
                let period = period.unwrap_or_else(|| self.service.current_period());
                let report = self.service.refresh(period).await?;
                self.emit(&report, || format_refresh(&report))?;
            }
            Commands::Live { period } => {
                let period = period.unwrap_or_else(|| self.service.current_period());
                let (report, games) = self.service.live(period).await?;
                self.emit(&games, || format_scoreboard(period, &games) + &format_warnings(&report))?;
            }
            Commands::Rankings { period, league } => {
                let period = period.unwrap_or_else(|| self.service.current_period());
                let rankings = self.service.weekly_rankings(period, league).await?;
                self.emit(&rankings, || format_rankings(period, league, &rankings))?;
            }
            Commands::Standings { league } => {
                let standings = self.service.season_standings(league).await?;
                self.emit(&standings, || format_standings(league, &standings))?;
            }
            Commands::Pair { brown, red, period } => {
                let pairing = self.service.add_pairing(&brown, &red, period).await?;
                let scope = period.map_or_else(|| "every week".to_string(), |p| format!("week {p}"));
                self.emit(&pairing, || format!("✅ {} (brown) will play {} (red) {}\n", brown, red, scope))?;
            }
            Commands::CurrentPeriod => {
                let period = self.service.current_period();
                let closed = self.service.is_period_closed(period);
                let state = if closed { "closed" } else { "in progress" };
                self.emit(&serde_json::json!({ "period": period, "closed": closed }), || {
                    format!("📅 Week {} ({})\n", period, state)
                })?;
            }
        }
        Ok(())
    }
}

fn league_label(league: Option<League>) -> String {
    league.map_or_else(|| "Both leagues".to_string(), |l| format!("{} league", capitalize(l.as_str())))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn header(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(50))
}

pub fn format_refresh(report: &RefreshReport) -> String {
    let state = if report.closed { "closed" } else { "in progress" };
    let mut out = header(&format!("🔄 Week {} refresh ({})", report.period, state));

    out.push_str(&format!("Outcomes: {}\n", report.outcomes.len()));
    if report.persisted {
        out.push_str("💾 Results recorded\n");
    } else if report.closed {
        out.push_str("⚠️  Nothing recorded: no scores were available\n");
    } else {
        out.push_str("Live results only; the week is not final yet\n");
    }

    out.push_str(&format_warnings(report));
    out
}

pub fn format_warnings(report: &RefreshReport) -> String {
    report.warnings.iter().map(|w| format!("⚠️  {w}\n")).collect()
}

pub fn format_scoreboard(period: Period, games: &[LiveGame]) -> String {
    let mut out = header(&format!("🏈 Week {} scoreboard", period));
    if games.is_empty() {
        out.push_str("No games found\n");
        return out;
    }

    for game in games {
        let status = match game.result {
            Some(GameResult::Winner(team)) if team == game.home.team => format!("Final: {} wins", game.home.display_name),
            Some(GameResult::Winner(_)) => format!("Final: {} wins", game.away.display_name),
            Some(GameResult::Tie) => "Final: Tie".to_string(),
            None if game.leader.is_none() => "Level".to_string(),
            None => "Live".to_string(),
        };
        out.push_str(&format!(
            "[{}] {} {:.2} vs {:.2} {}  {}\n",
            game.league, game.home.display_name, game.home.score, game.away.score, game.away.display_name, status
        ));
    }
    out
}

pub fn format_rankings(period: Period, league: Option<League>, rankings: &[RankedScore]) -> String {
    let mut out = header(&format!("📊 Week {} rankings: {}", period, league_label(league)));
    if rankings.is_empty() {
        out.push_str("No scores found\n");
        return out;
    }

    for row in rankings {
        out.push_str(&format!("{:>3}. {:<24} {:<6} {:>8.2}\n", row.rank, row.display_name, row.league, row.score));
    }
    out
}

pub fn format_standings(league: Option<League>, rows: &[SeasonStandingsRow]) -> String {
    let mut out = header(&format!("🏆 Season standings: {}", league_label(league)));
    if rows.is_empty() {
        out.push_str("No recorded weeks yet\n");
        return out;
    }

    out.push_str(&format!(
        "{:>4}  {:<24} {:<6} {:>5} {:>5} {:>5} {:>6} {:>6} {:>9}\n",
        "Rank", "Team", "League", "H2H", "Cross", "Top", "Points", "Losses", "Score"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:>4}  {:<24} {:<6} {:>5} {:>5} {:>5} {:>6} {:>6} {:>9.2}\n",
            row.rank,
            row.display_name,
            row.league,
            row.intra_points,
            row.cross_points,
            row.top_n_points,
            row.total_points,
            row.total_losses,
            row.score
        ));
    }
    out
}
