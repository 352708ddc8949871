use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of independent scoring axes: intra-league, cross-league, top-N
pub const SCORING_AXES: u32 = 3;

/// Default number of teams that earn the placement point each period
pub const DEFAULT_TOP_N: usize = 6;

/// Configuration for the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Teams within the top N of the combined pool earn the placement point.
    /// With six teams per league and N = 6, half the pool qualifies.
    pub top_n: usize,

    /// How a head-to-head tie is credited
    pub tie_policy: TiePolicy,
}

/// Credit awarded to both sides of a tied head-to-head matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Neither side scores the point
    #[default]
    NoCredit,

    /// Each side scores half a point
    Split,
}

impl TiePolicy {
    /// Points each side receives on a tie
    pub fn tie_credit(&self) -> f64 {
        match self {
            TiePolicy::NoCredit => 0.0,
            TiePolicy::Split => 0.5,
        }
    }
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiePolicy::NoCredit => f.write_str("no_credit"),
            TiePolicy::Split => f.write_str("split"),
        }
    }
}

impl FromStr for TiePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_credit" => Ok(TiePolicy::NoCredit),
            "split" => Ok(TiePolicy::Split),
            other => Err(format!("Unknown tie policy: {other}")),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N, tie_policy: TiePolicy::NoCredit }
    }
}

impl ScoringConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("top_n must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.top_n, 6);
        assert_eq!(config.tie_policy, TiePolicy::NoCredit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = ScoringConfig { top_n: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tie_policy_parsing() {
        assert_eq!("split".parse::<TiePolicy>().unwrap(), TiePolicy::Split);
        assert_eq!("no_credit".parse::<TiePolicy>().unwrap(), TiePolicy::NoCredit);
        assert!("coin_flip".parse::<TiePolicy>().is_err());
        assert_eq!(TiePolicy::Split.tie_credit(), 0.5);
    }
}
