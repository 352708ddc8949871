use crate::config::{EspnConfig, EspnLeagueConfig};
use crate::models::LeagueResponse;
use anyhow::{Context, Result};
use league_registry::{League, Team};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::Client;
use scoring_engine::{LeagueFeed, MatchupPair, Period, ScoreSnapshot};
use std::time::Duration as StdDuration;
use tracing::{debug, info};

/// ESPN fantasy API client for one league
pub struct EspnLeagueClient {
    league: League,
    league_config: EspnLeagueConfig,
    base_url: String,
    season: i32,
    starting_slots: Vec<i32>,
    client: Client,
}

impl EspnLeagueClient {
    /// Create a client for `league`
    pub fn new(config: &EspnConfig, league: League) -> Result<Self> {
        config.validate_league(league).map_err(anyhow::Error::msg)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("league-dashboard/0.1"));
        if let Some(cookie) = config.cookie_header() {
            headers.insert(COOKIE, HeaderValue::from_str(&cookie).context("Invalid ESPN cookie value")?);
        }

        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            league,
            league_config: config.league(league).clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            season: config.season,
            starting_slots: config.starting_slots.clone(),
            client,
        })
    }

    pub fn league_url(&self) -> String {
        format!("{}/{}/segments/0/leagues/{}", self.base_url, self.season, self.league_config.league_id)
    }

    /// Fetch one view of the league, optionally for a scoring period
    async fn fetch_view(&self, view: &str, period: Option<Period>) -> Result<LeagueResponse> {
        let url = self.league_url();
        let mut query = vec![("view", view.to_string())];
        if let Some(period) = period {
            query.push(("scoringPeriodId", period.to_string()));
        }

        debug!("Fetching {} view {} (period {:?}) from {}", self.league, view, period, url);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {view} for the {} league", self.league))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "ESPN request for {} ({} league) failed with status: {}",
                view,
                self.league,
                response.status()
            );
        }

        response
            .json::<LeagueResponse>()
            .await
            .with_context(|| format!("Failed to parse {view} response for the {} league", self.league))
    }
}

#[async_trait::async_trait]
impl LeagueFeed for EspnLeagueClient {
    fn league(&self) -> League {
        self.league
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        let response = self.fetch_view("mTeam", None).await?;
        let teams = response.to_teams(self.league, &self.league_config);
        info!("Fetched {} {} league teams", teams.len(), self.league);
        Ok(teams)
    }

    async fn fetch_scores(&self, period: Period) -> Result<ScoreSnapshot> {
        let response = self.fetch_view("mRoster", Some(period)).await?;
        let snapshot = response.to_scores(self.league, &self.starting_slots)?;
        info!("Fetched {} {} league scores for week {}", snapshot.len(), self.league, period);
        Ok(snapshot)
    }

    async fn fetch_intra_matchups(&self, period: Period) -> Result<Vec<MatchupPair>> {
        let response = self.fetch_view("mMatchup", Some(period)).await?;
        let matchups = response.to_matchups(self.league, period);
        info!("Fetched {} {} league matchups for week {}", matchups.len(), self.league, period);
        Ok(matchups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_url() {
        let client = EspnLeagueClient::new(&EspnConfig::default(), League::Brown).unwrap();
        assert_eq!(
            client.league_url(),
            "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl/seasons/2025/segments/0/leagues/1732780114"
        );
        assert_eq!(client.league(), League::Brown);
    }

    #[test]
    fn test_requires_league_id() {
        assert!(EspnLeagueClient::new(&EspnConfig::default(), League::Red).is_err());

        let mut config = EspnConfig::default();
        config.red.league_id = "99".to_string();
        assert!(EspnLeagueClient::new(&config, League::Red).is_ok());
    }
}
