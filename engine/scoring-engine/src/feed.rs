//! Seams to the outside world: where scores come from and when a period ends

use crate::models::{MatchupPair, Period};
use crate::snapshot::ScoreSnapshot;
use chrono::{DateTime, Utc};
use league_registry::{League, Team};

/// A source of one league's teams, scores and schedule.
///
/// Implementations namespace every identity they return into their own
/// league before handing it over.
#[async_trait::async_trait]
pub trait LeagueFeed: Send + Sync {
    fn league(&self) -> League;

    async fn fetch_teams(&self) -> anyhow::Result<Vec<Team>>;

    /// Scores for the period; may be partial or empty
    async fn fetch_scores(&self, period: Period) -> anyhow::Result<ScoreSnapshot>;

    /// The league's own schedule for the period
    async fn fetch_intra_matchups(&self, period: Period) -> anyhow::Result<Vec<MatchupPair>>;
}

/// Decides which period is current and whether a period is final
pub trait PeriodClock: Send + Sync {
    fn is_period_closed(&self, period: Period, now: DateTime<Utc>) -> bool;

    fn current_period(&self, now: DateTime<Utc>) -> Period;

    /// Number of periods in the season; valid periods are `1..=season_weeks()`
    fn season_weeks(&self) -> Period;
}
