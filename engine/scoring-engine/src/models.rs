use crate::config::SCORING_AXES;
use league_registry::{League, RegistryError, TeamId, TeamRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scoring week of the competition, starting at 1
pub type Period = u32;

/// Intra-league schedule entry; symmetric in `team_a`/`team_b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupPair {
    pub period: Period,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub league: League,
}

impl MatchupPair {
    pub fn new(period: Period, team_a: TeamId, team_b: TeamId, league: League) -> Self {
        Self { period, team_a, team_b, league }
    }

    /// The other side of the pair, if `team` plays in it
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.team_a == team {
            Some(self.team_b)
        } else if self.team_b == team {
            Some(self.team_a)
        } else {
            None
        }
    }
}

/// Cross-league pairing between one Brown team and one Red team.
///
/// A pairing without a period applies to every period that has no
/// period-specific pairings of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossPairing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    pub brown_side: TeamId,
    pub red_side: TeamId,
}

impl CrossPairing {
    /// Build a pairing, checking each side belongs to its league
    pub fn new(brown_side: TeamId, red_side: TeamId, period: Option<Period>) -> Result<Self, String> {
        let pairing = Self { period, brown_side, red_side };
        pairing.validate()?;
        Ok(pairing)
    }

    /// Capture a pairing from display names. Names are resolved once here and
    /// the pairing is stored by identity from then on.
    pub fn from_names(
        brown_name: &str,
        red_name: &str,
        period: Option<Period>,
        registry: &TeamRegistry,
    ) -> Result<Self, RegistryError> {
        let brown_side = registry.resolve(brown_name, League::Brown)?;
        let red_side = registry.resolve(red_name, League::Red)?;
        Ok(Self { period, brown_side, red_side })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.brown_side.league() != League::Brown {
            return Err(format!("brown_side {} is not a Brown team", self.brown_side));
        }
        if self.red_side.league() != League::Red {
            return Err(format!("red_side {} is not a Red team", self.red_side));
        }
        Ok(())
    }

    /// Whether this pairing covers the given period
    pub fn applies_to(&self, period: Period) -> bool {
        self.period.map_or(true, |p| p == period)
    }

    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.brown_side == team {
            Some(self.red_side)
        } else if self.red_side == team {
            Some(self.brown_side)
        } else {
            None
        }
    }
}

/// One team's result for one period. This is the durable unit of record,
/// keyed by `(period, team_identity)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyOutcome {
    pub period: Period,
    pub team_identity: TeamId,
    pub league: League,
    pub score: f64,
    pub intra_opponent: Option<TeamId>,
    pub intra_opponent_score: f64,
    pub cross_opponent: Option<TeamId>,
    pub cross_opponent_score: f64,
    pub intra_points: f64,
    pub cross_points: f64,
    pub top_n_points: f64,
    pub total_points: f64,
    pub total_losses: f64,
    pub period_closed: bool,
}

impl WeeklyOutcome {
    /// Check the record is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.team_identity.league() != self.league {
            return Err(format!(
                "league '{}' disagrees with identity {}",
                self.league, self.team_identity
            ));
        }

        if let Some(opponent) = self.intra_opponent {
            if opponent.league() != self.league {
                return Err(format!("intra opponent {opponent} is not in the {} league", self.league));
            }
        }

        if let Some(opponent) = self.cross_opponent {
            if opponent.league() != self.league.other() {
                return Err(format!("cross opponent {opponent} is not in the {} league", self.league.other()));
            }
        }

        let axes = [self.intra_points, self.cross_points, self.top_n_points];
        if axes.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err("axis points must lie between 0 and 1".to_string());
        }

        let sum: f64 = axes.iter().sum();
        if (sum - self.total_points).abs() > f64::EPSILON {
            return Err(format!("total_points {} is not the sum of axis points {sum}", self.total_points));
        }

        if self.period_closed {
            let expected = SCORING_AXES as f64 - self.total_points;
            if (self.total_losses - expected).abs() > f64::EPSILON {
                return Err(format!("total_losses {} should be {expected} for a closed period", self.total_losses));
            }
        } else if self.total_points != 0.0 || self.total_losses != 0.0 {
            return Err("open period carries points".to_string());
        }

        Ok(())
    }
}

/// Degraded-input conditions reported by a refresh instead of failing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefreshWarning {
    /// A league's score source returned nothing for the period
    SourceUnavailable { league: League },

    /// A registered team has no score this period
    MissingScore { team: TeamId },

    /// A schedule or pairing names a team the registry does not know
    UnknownOpponent { team: TeamId },

    /// A team was scored but is not in the registry
    UnregisteredTeam { team: TeamId },

    /// A team is scheduled twice in the same period
    ScheduleConflict { team: TeamId, period: Period },
}

impl fmt::Display for RefreshWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshWarning::SourceUnavailable { league } => {
                write!(f, "no scores available for the {league} league")
            }
            RefreshWarning::MissingScore { team } => write!(f, "no score for {team}, counted as 0"),
            RefreshWarning::UnknownOpponent { team } => write!(f, "unknown team {team} in matchups, ignored"),
            RefreshWarning::UnregisteredTeam { team } => write!(f, "scored team {team} is not registered"),
            RefreshWarning::ScheduleConflict { team, period } => {
                write!(f, "{team} is scheduled more than once in period {period}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_registry::Team;

    fn outcome() -> WeeklyOutcome {
        WeeklyOutcome {
            period: 1,
            team_identity: TeamId::namespace(1, League::Brown),
            league: League::Brown,
            score: 110.0,
            intra_opponent: Some(TeamId::namespace(2, League::Brown)),
            intra_opponent_score: 95.0,
            cross_opponent: Some(TeamId::namespace(1, League::Red)),
            cross_opponent_score: 120.0,
            intra_points: 1.0,
            cross_points: 0.0,
            top_n_points: 1.0,
            total_points: 2.0,
            total_losses: 1.0,
            period_closed: true,
        }
    }

    #[test]
    fn test_valid_outcome() {
        assert!(outcome().validate().is_ok());
    }

    #[test]
    fn test_league_must_match_identity() {
        let mut row = outcome();
        row.league = League::Red;
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_losses_must_complete_axes_when_closed() {
        let mut row = outcome();
        row.total_losses = 0.0;
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_open_period_cannot_carry_points() {
        let mut row = outcome();
        row.period_closed = false;
        assert!(row.validate().is_err());
    }

    #[test]
    fn test_outcome_missing_league_is_rejected() {
        let mut json = serde_json::to_value(outcome()).unwrap();
        json.as_object_mut().unwrap().remove("league");
        assert!(serde_json::from_value::<WeeklyOutcome>(json).is_err());
    }

    #[test]
    fn test_cross_pairing_from_names() {
        let registry = TeamRegistry::from_teams(vec![
            Team::new(1, "Andrew", League::Brown),
            Team::new(1, "Brad", League::Red),
        ])
        .unwrap();

        let pairing = CrossPairing::from_names("Andrew", "Brad", None, &registry).unwrap();
        assert_eq!(pairing.brown_side, TeamId::namespace(1, League::Brown));
        assert_eq!(pairing.red_side, TeamId::namespace(1, League::Red));
        assert!(pairing.applies_to(7));

        assert!(CrossPairing::from_names("Brad", "Andrew", None, &registry).is_err());
    }

    #[test]
    fn test_cross_pairing_sides_checked() {
        let brown = TeamId::namespace(1, League::Brown);
        assert!(CrossPairing::new(brown, brown, None).is_err());
    }

    #[test]
    fn test_matchup_opponent() {
        let a = TeamId::namespace(1, League::Red);
        let b = TeamId::namespace(2, League::Red);
        let pair = MatchupPair::new(3, a, b, League::Red);

        assert_eq!(pair.opponent_of(a), Some(b));
        assert_eq!(pair.opponent_of(b), Some(a));
        assert_eq!(pair.opponent_of(TeamId::namespace(3, League::Red)), None);
    }
}
