use chrono::NaiveDate;
use league_registry::League;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the ESPN score source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EspnConfig {
    /// Fantasy API root, without season or league
    pub base_url: String,

    /// Season year (e.g. 2025)
    pub season: i32,

    /// Brown league settings
    pub brown: EspnLeagueConfig,

    /// Red league settings
    pub red: EspnLeagueConfig,

    /// Where to find the session cookies for private leagues
    pub cookies: CookieConfig,

    /// Lineup slots that count towards a team's score; everything else is bench
    pub starting_slots: Vec<i32>,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Season calendar
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EspnLeagueConfig {
    /// ESPN league id
    pub league_id: String,

    /// Manager names by ESPN team id, used as display names
    pub managers: BTreeMap<String, String>,
}

impl EspnLeagueConfig {
    /// Display name for an ESPN team id
    pub fn manager_name(&self, team_id: u32) -> String {
        self.managers.get(&team_id.to_string()).cloned().unwrap_or_else(|| format!("Team {team_id}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Environment variable holding the SWID cookie
    pub swid_env: String,

    /// Environment variable holding the espn_s2 cookie
    pub espn_s2_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// First day of week 1
    pub season_start: NaiveDate,

    /// Days after a week starts before its results are final
    pub days_until_closed: i64,

    /// Number of regular-season weeks
    pub regular_season_weeks: u32,
}

impl Default for EspnConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl/seasons".to_string(),
            season: 2025,
            brown: EspnLeagueConfig {
                league_id: "1732780114".to_string(),
                managers: BTreeMap::from([
                    ("1".to_string(), "John Van Handel".to_string()),
                    ("2".to_string(), "Andrew Lupario".to_string()),
                    ("3".to_string(), "Matt Plantz".to_string()),
                    ("4".to_string(), "Josh Brechtel".to_string()),
                    ("5".to_string(), "Michael McCormick".to_string()),
                    ("6".to_string(), "Will Grant".to_string()),
                ]),
            },
            red: EspnLeagueConfig::default(),
            cookies: CookieConfig::default(),
            // QB(0), TE(6), DL(11), DB(14), P(18), HC(19), FLEX(23); 20 is bench
            starting_slots: vec![0, 6, 11, 14, 18, 19, 23],
            timeout_secs: 30,
            calendar: CalendarConfig::default(),
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self { swid_env: "ESPN_SWID".to_string(), espn_s2_env: "ESPN_S2".to_string() }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            season_start: NaiveDate::from_ymd_opt(2025, 9, 4).unwrap_or(NaiveDate::MIN),
            days_until_closed: 5,
            regular_season_weeks: 14,
        }
    }
}

impl EspnConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from `ESPN_*` environment variables when present
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(season) = std::env::var("ESPN_SEASON") {
            self.season = season.parse().map_err(|_| anyhow::anyhow!("Invalid ESPN_SEASON: {season}"))?;
        }

        if let Ok(id) = std::env::var("ESPN_BROWN_LEAGUE_ID") {
            self.brown.league_id = id;
        }

        if let Ok(id) = std::env::var("ESPN_RED_LEAGUE_ID") {
            self.red.league_id = id;
        }

        Ok(())
    }

    pub fn league(&self, league: League) -> &EspnLeagueConfig {
        match league {
            League::Brown => &self.brown,
            League::Red => &self.red,
        }
    }

    /// Cookie header for private leagues; `None` when either cookie is unset
    pub fn cookie_header(&self) -> Option<String> {
        let swid = std::env::var(&self.cookies.swid_env).ok().filter(|v| !v.is_empty())?;
        let espn_s2 = std::env::var(&self.cookies.espn_s2_env).ok().filter(|v| !v.is_empty())?;
        Some(format!("SWID={swid}; espn_s2={espn_s2}"))
    }

    /// Validate the settings needed to talk to `league`
    pub fn validate_league(&self, league: League) -> Result<(), String> {
        if self.league(league).league_id.trim().is_empty() {
            return Err(format!("No ESPN league id configured for the {league} league"));
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("ESPN base_url cannot be empty".to_string());
        }
        if self.starting_slots.is_empty() {
            return Err("At least one starting lineup slot is required".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.calendar.regular_season_weeks == 0 {
            return Err("regular_season_weeks must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EspnConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_league(League::Brown).is_ok());
        assert!(config.validate_league(League::Red).is_err());
        assert_eq!(config.calendar.season_start, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        assert_eq!(config.brown.manager_name(2), "Andrew Lupario");
        assert_eq!(config.brown.manager_name(9), "Team 9");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EspnConfig = serde_json::from_value(serde_json::json!({
            "season": 2026,
            "red": { "league_id": "42", "managers": { "1": "Brad" } }
        }))
        .unwrap();

        assert_eq!(config.season, 2026);
        assert_eq!(config.red.league_id, "42");
        assert_eq!(config.red.manager_name(1), "Brad");
        assert_eq!(config.starting_slots, vec![0, 6, 11, 14, 18, 19, 23]);
        assert_eq!(config.calendar.regular_season_weeks, 14);
    }
}
