//! Refresh orchestration: fetch both leagues, score the period, record it

use anyhow::{Context, Result};
use chrono::Utc;
use league_registry::{League, Team, TeamRegistry};
use persistence::CollectionStore;
use scoring_engine::views::{self, LiveGame, RankedScore};
use scoring_engine::{
    CrossPairing, LeagueFeed, LeagueStore, MatchupPair, Period, PeriodClock, PeriodInput, RefreshWarning,
    ScoreSnapshot, ScoringEngine, SeasonStandingsRow, StandingsAggregator, WeeklyOutcome,
};
use serde::Serialize;
use tracing::{info, warn};

/// What a refresh computed and whether it was recorded
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub period: Period,
    pub closed: bool,
    pub outcomes: Vec<WeeklyOutcome>,
    pub warnings: Vec<RefreshWarning>,
    /// Only closed periods are recorded
    pub persisted: bool,
}

/// The two league feeds, Brown then Red
pub struct LeagueFeeds {
    brown: Box<dyn LeagueFeed>,
    red: Box<dyn LeagueFeed>,
}

impl LeagueFeeds {
    pub fn new(brown: Box<dyn LeagueFeed>, red: Box<dyn LeagueFeed>) -> Result<Self> {
        if brown.league() != League::Brown || red.league() != League::Red {
            anyhow::bail!(
                "League feeds are swapped: got {} and {}, expected brown and red",
                brown.league(),
                red.league()
            );
        }
        Ok(Self { brown, red })
    }
}

/// Everything a period's scoring needs, fetched from the feeds
struct PeriodData {
    registry: TeamRegistry,
    brown_scores: ScoreSnapshot,
    red_scores: ScoreSnapshot,
    matchups: Vec<MatchupPair>,
    pairings: Vec<CrossPairing>,
}

/// Dashboard operations over the store, the scoring engine and the feeds
pub struct RefreshService<S> {
    store: LeagueStore<S>,
    engine: ScoringEngine,
    clock: Box<dyn PeriodClock>,
    feeds: Option<LeagueFeeds>,
}

impl<S: CollectionStore> RefreshService<S> {
    /// Create a service that works from stored data only
    pub fn new(store: LeagueStore<S>, engine: ScoringEngine, clock: Box<dyn PeriodClock>) -> Self {
        Self { store, engine, clock, feeds: None }
    }

    /// Attach the league feeds needed for refreshes
    pub fn with_feeds(mut self, feeds: LeagueFeeds) -> Self {
        self.feeds = Some(feeds);
        self
    }

    pub fn store(&self) -> &LeagueStore<S> {
        &self.store
    }

    fn feeds(&self) -> Result<&LeagueFeeds> {
        self.feeds.as_ref().context("League feeds are not configured")
    }

    pub fn current_period(&self) -> Period {
        self.clock.current_period(Utc::now())
    }

    pub fn is_period_closed(&self, period: Period) -> bool {
        self.clock.is_period_closed(period, Utc::now())
    }

    /// Reject weeks outside the regular season
    pub fn check_period(&self, period: Period) -> Result<()> {
        let weeks = self.clock.season_weeks();
        if !(1..=weeks).contains(&period) {
            anyhow::bail!("Week {} is outside the season (1..={})", period, weeks);
        }
        Ok(())
    }

    /// The stored team list; fetched from both leagues and saved when the
    /// store has none yet
    pub async fn load_registry(&self) -> Result<TeamRegistry> {
        let registry = self.store.load_registry().await.context("Failed to load teams")?;
        if !registry.is_empty() {
            return Ok(registry);
        }

        info!("No stored teams; fetching from both leagues");
        self.fetch_registry().await
    }

    /// The stored team list, or a fetched one when none is stored. Never writes.
    async fn read_registry(&self) -> Result<TeamRegistry> {
        let registry = self.store.load_registry().await.context("Failed to load teams")?;
        if !registry.is_empty() {
            return Ok(registry);
        }

        let (_, registry) = self.fetch_teams().await?;
        Ok(registry)
    }

    async fn fetch_teams(&self) -> Result<(Vec<Team>, TeamRegistry)> {
        let feeds = self.feeds()?;
        let (brown, red) = tokio::try_join!(feeds.brown.fetch_teams(), feeds.red.fetch_teams())?;

        let teams: Vec<_> = brown.into_iter().chain(red).collect();
        let registry = TeamRegistry::from_teams(teams.iter().cloned()).context("Fetched teams do not form a registry")?;
        Ok((teams, registry))
    }

    async fn fetch_registry(&self) -> Result<TeamRegistry> {
        let (teams, registry) = self.fetch_teams().await?;
        self.store.save_teams(&teams).await.context("Failed to save teams")?;
        Ok(registry)
    }

    /// Current teams: fetched fresh when possible, the stored list otherwise
    async fn refresh_registry(&self) -> Result<TeamRegistry> {
        match self.fetch_registry().await {
            Ok(registry) => Ok(registry),
            Err(e) => {
                warn!("Could not refresh teams ({:#}); using the stored list", e);
                let registry = self.store.load_registry().await.context("Failed to load teams")?;
                if registry.is_empty() {
                    return Err(e.context("No teams available"));
                }
                Ok(registry)
            }
        }
    }

    async fn fetch_scores(feed: &dyn LeagueFeed, period: Period) -> ScoreSnapshot {
        match feed.fetch_scores(period).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Scores unavailable for the {} league, week {}: {:#}", feed.league(), period, e);
                ScoreSnapshot::empty(feed.league())
            }
        }
    }

    async fn fetch_matchups(feed: &dyn LeagueFeed, period: Period) -> Vec<MatchupPair> {
        match feed.fetch_intra_matchups(period).await {
            Ok(matchups) => matchups,
            Err(e) => {
                warn!("Schedule unavailable for the {} league, week {}: {:#}", feed.league(), period, e);
                Vec::new()
            }
        }
    }

    async fn gather(&self, period: Period, record: bool) -> Result<PeriodData> {
        let feeds = self.feeds()?;
        let registry = if record { self.refresh_registry().await? } else { self.read_registry().await? };

        let (brown_scores, red_scores, brown_games, red_games) = tokio::join!(
            Self::fetch_scores(feeds.brown.as_ref(), period),
            Self::fetch_scores(feeds.red.as_ref(), period),
            Self::fetch_matchups(feeds.brown.as_ref(), period),
            Self::fetch_matchups(feeds.red.as_ref(), period),
        );

        let pairings = self.store.load_cross_pairings().await.context("Failed to load cross pairings")?;

        Ok(PeriodData {
            registry,
            brown_scores,
            red_scores,
            matchups: brown_games.into_iter().chain(red_games).collect(),
            pairings,
        })
    }

    async fn score(&self, period: Period, record: bool) -> Result<(RefreshReport, TeamRegistry)> {
        self.check_period(period)?;
        let data = self.gather(period, record).await?;
        let closed = self.is_period_closed(period);

        let result = self.engine.compute_period(&PeriodInput {
            period,
            registry: &data.registry,
            brown_scores: &data.brown_scores,
            red_scores: &data.red_scores,
            intra_matchups: &data.matchups,
            cross_pairings: &data.pairings,
            period_closed: closed,
        })?;

        let persisted = record && closed && !result.outcomes.is_empty();
        if persisted {
            self.store
                .upsert_weekly_outcomes(period, &result.outcomes)
                .await
                .with_context(|| format!("Failed to record week {period}"))?;
        } else if record && closed {
            warn!("Week {} produced no outcomes; stored results left unchanged", period);
        }

        let report = RefreshReport { period, closed, outcomes: result.outcomes, warnings: result.warnings, persisted };
        Ok((report, data.registry))
    }

    /// Score a period and, once it is closed, record its outcomes
    pub async fn refresh(&self, period: Period) -> Result<RefreshReport> {
        info!("🔄 Refreshing week {}", period);
        let (report, _) = self.score(period, true).await?;

        info!(
            "Week {} refreshed: {} outcomes, {} warnings, {}",
            period,
            report.outcomes.len(),
            report.warnings.len(),
            if report.persisted { "recorded" } else { "not recorded" }
        );

        Ok(report)
    }

    /// Score a period without recording anything, teams included
    pub async fn live(&self, period: Period) -> Result<(RefreshReport, Vec<LiveGame>)> {
        let (report, registry) = self.score(period, false).await?;
        let games = views::live_scoreboard(&report.outcomes, &registry);
        Ok((report, games))
    }

    /// The period's scores ranked across the pool or within one league
    pub async fn weekly_rankings(&self, period: Period, league: Option<League>) -> Result<Vec<RankedScore>> {
        self.check_period(period)?;
        let feeds = self.feeds()?;
        let registry = self.read_registry().await?;

        let (brown, red) = tokio::join!(
            Self::fetch_scores(feeds.brown.as_ref(), period),
            Self::fetch_scores(feeds.red.as_ref(), period)
        );
        let pool = ScoreSnapshot::combine(&brown, &red)?;

        Ok(views::weekly_rankings(&pool, &registry, league))
    }

    /// Season standings from recorded outcomes
    pub async fn season_standings(&self, league: Option<League>) -> Result<Vec<SeasonStandingsRow>> {
        let registry = self.store.load_registry().await.context("Failed to load teams")?;
        let history = self.store.get_weekly_outcomes(None).await.context("Failed to load weekly outcomes")?;
        Ok(StandingsAggregator::standings(&history, league, &registry))
    }

    /// Record a cross-league pairing given the two teams' display names
    pub async fn add_pairing(&self, brown_name: &str, red_name: &str, period: Option<Period>) -> Result<CrossPairing> {
        if let Some(period) = period {
            self.check_period(period)?;
        }
        let registry = self.load_registry().await?;
        let pairing = CrossPairing::from_names(brown_name, red_name, period, &registry)?;
        self.store.add_cross_pairing(pairing.clone()).await?;

        info!(
            "Paired {} with {} ({})",
            brown_name,
            red_name,
            period.map_or_else(|| "every week".to_string(), |p| format!("week {p}"))
        );

        Ok(pairing)
    }
}
