//! ESPN Fetcher
//!
//! Reads teams, starting-lineup scores and schedules for the Brown and Red
//! leagues from the ESPN fantasy API and hands them to the scoring engine
//! already namespaced. Also provides the season calendar that decides when a
//! week is final.

pub mod calendar;
pub mod config;
pub mod fetcher;
pub mod models;

pub use calendar::SeasonCalendar;
pub use config::{CalendarConfig, CookieConfig, EspnConfig, EspnLeagueConfig};
pub use fetcher::EspnLeagueClient;
pub use models::{LeagueResponse, LineupSlot};
