//! Scoring Engine
//!
//! Turns one period's raw team scores and matchup assignments into weekly
//! point awards on three axes (intra-league win, cross-league win, top-N
//! placement), and folds the stored weekly outcomes into season standings.
//!
//! Everything except [`store`] and [`feed`] is pure and synchronous.

pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod matchups;
pub mod models;
pub mod snapshot;
pub mod standings;
pub mod store;
pub mod views;

pub use calculator::{HeadToHead, OutcomeInput, PointsCalculator};
pub use config::{ScoringConfig, TiePolicy, SCORING_AXES};
pub use engine::{PeriodInput, PeriodOutcome, ScoringEngine};
pub use error::{Result, ScoringError};
pub use feed::{LeagueFeed, PeriodClock};
pub use matchups::MatchupResolver;
pub use models::*;
pub use snapshot::{ScorePool, ScoreSnapshot};
pub use standings::{SeasonStandingsRow, StandingsAggregator};
pub use store::LeagueStore;
