use crate::config::{ScoringConfig, TiePolicy, SCORING_AXES};
use crate::models::{Period, WeeklyOutcome};
use league_registry::TeamId;

/// A team's opponent on one head-to-head axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadToHead {
    pub opponent: Option<TeamId>,
    pub opponent_score: f64,
}

impl HeadToHead {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn against(opponent: TeamId, opponent_score: f64) -> Self {
        Self { opponent: Some(opponent), opponent_score }
    }
}

/// Everything needed to score one team for one period
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeInput {
    pub period: Period,
    pub team: TeamId,
    /// `None` when the score source had nothing for the team
    pub score: Option<f64>,
    pub intra: HeadToHead,
    pub cross: HeadToHead,
    pub in_top_n: bool,
    pub period_closed: bool,
}

/// Applies the three scoring rules to one team
pub struct PointsCalculator {
    tie_policy: TiePolicy,
}

impl PointsCalculator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self { tie_policy: config.tie_policy }
    }

    pub fn with_tie_policy(tie_policy: TiePolicy) -> Self {
        Self { tie_policy }
    }

    /// Build the team's outcome record.
    ///
    /// Open periods never carry points. A team with no score counts as 0 and
    /// cannot win any axis, not even against an opponent who also scored 0.
    pub fn compute(&self, input: &OutcomeInput) -> WeeklyOutcome {
        let present = input.score.is_some();
        let score = input.score.unwrap_or(0.0);

        let (intra_points, cross_points, top_n_points) = if input.period_closed && present {
            (
                self.head_to_head_points(score, &input.intra),
                self.head_to_head_points(score, &input.cross),
                if input.in_top_n { 1.0 } else { 0.0 },
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        let total_points = intra_points + cross_points + top_n_points;
        let total_losses = if input.period_closed { SCORING_AXES as f64 - total_points } else { 0.0 };

        WeeklyOutcome {
            period: input.period,
            team_identity: input.team,
            league: input.team.league(),
            score,
            intra_opponent: input.intra.opponent,
            intra_opponent_score: input.intra.opponent_score,
            cross_opponent: input.cross.opponent,
            cross_opponent_score: input.cross.opponent_score,
            intra_points,
            cross_points,
            top_n_points,
            total_points,
            total_losses,
            period_closed: input.period_closed,
        }
    }

    fn head_to_head_points(&self, score: f64, h2h: &HeadToHead) -> f64 {
        if h2h.opponent.is_none() {
            return 0.0;
        }

        if score > h2h.opponent_score {
            1.0
        } else if score == h2h.opponent_score {
            self.tie_policy.tie_credit()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_registry::League;

    fn input(score: f64, intra: HeadToHead, cross: HeadToHead, in_top_n: bool, closed: bool) -> OutcomeInput {
        OutcomeInput {
            period: 1,
            team: TeamId::namespace(1, League::Brown),
            score: Some(score),
            intra,
            cross,
            in_top_n,
            period_closed: closed,
        }
    }

    fn opponent(score: f64) -> HeadToHead {
        HeadToHead::against(TeamId::namespace(2, League::Brown), score)
    }

    fn cross_opponent(score: f64) -> HeadToHead {
        HeadToHead::against(TeamId::namespace(1, League::Red), score)
    }

    #[test]
    fn test_closed_period_scoring() {
        let calc = PointsCalculator::with_tie_policy(TiePolicy::NoCredit);
        let outcome = calc.compute(&input(110.0, opponent(95.0), cross_opponent(120.0), true, true));

        assert_eq!(outcome.intra_points, 1.0);
        assert_eq!(outcome.cross_points, 0.0);
        assert_eq!(outcome.top_n_points, 1.0);
        assert_eq!(outcome.total_points, 2.0);
        assert_eq!(outcome.total_losses, 1.0);
        assert!(outcome.validate().is_ok());
    }

    #[test]
    fn test_open_period_awards_nothing() {
        let calc = PointsCalculator::with_tie_policy(TiePolicy::NoCredit);
        let outcome = calc.compute(&input(110.0, opponent(95.0), cross_opponent(80.0), true, false));

        assert_eq!(outcome.total_points, 0.0);
        assert_eq!(outcome.total_losses, 0.0);
        assert_eq!(outcome.intra_opponent_score, 95.0);
        assert!(!outcome.period_closed);
    }

    #[test]
    fn test_tie_policies() {
        let strict = PointsCalculator::with_tie_policy(TiePolicy::NoCredit);
        let split = PointsCalculator::with_tie_policy(TiePolicy::Split);
        let tied = input(100.0, opponent(100.0), HeadToHead::none(), false, true);

        assert_eq!(strict.compute(&tied).intra_points, 0.0);

        let outcome = split.compute(&tied);
        assert_eq!(outcome.intra_points, 0.5);
        assert_eq!(outcome.total_losses, 2.5);
    }

    #[test]
    fn test_no_opponent_is_no_game() {
        let calc = PointsCalculator::with_tie_policy(TiePolicy::Split);
        let outcome = calc.compute(&input(100.0, HeadToHead::none(), HeadToHead::none(), false, true));

        assert_eq!(outcome.intra_points, 0.0);
        assert_eq!(outcome.cross_points, 0.0);
        assert_eq!(outcome.intra_opponent, None);
        assert_eq!(outcome.total_losses, 3.0);
    }

    #[test]
    fn test_absent_team_cannot_win() {
        let calc = PointsCalculator::with_tie_policy(TiePolicy::Split);
        let mut absent = input(0.0, opponent(0.0), cross_opponent(0.0), true, true);
        absent.score = None;

        let outcome = calc.compute(&absent);
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.total_points, 0.0);
        assert_eq!(outcome.total_losses, 3.0);
    }
}
