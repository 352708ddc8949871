//! Read-only views over a period's results

use crate::models::{Period, WeeklyOutcome};
use crate::snapshot::ScorePool;
use league_registry::{League, TeamId, TeamRegistry};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    pub team: TeamId,
    pub display_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Winner(TeamId),
    Tie,
}

/// One intra-league game as shown on the scoreboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveGame {
    pub period: Period,
    pub league: League,
    pub home: ScoreLine,
    pub away: ScoreLine,
    /// Whoever is ahead right now; `None` while level
    pub leader: Option<TeamId>,
    /// Only set once the period is closed
    pub result: Option<GameResult>,
}

/// Intra-league games for a period, built from its outcome rows.
/// Each game appears once, Brown games first.
pub fn live_scoreboard(outcomes: &[WeeklyOutcome], registry: &TeamRegistry) -> Vec<LiveGame> {
    let mut games: Vec<LiveGame> = outcomes
        .iter()
        .filter_map(|outcome| {
            let opponent = outcome.intra_opponent?;
            if outcome.team_identity > opponent {
                return None;
            }

            let home = ScoreLine {
                team: outcome.team_identity,
                display_name: registry.display_name(outcome.team_identity),
                score: outcome.score,
            };
            let away = ScoreLine {
                team: opponent,
                display_name: registry.display_name(opponent),
                score: outcome.intra_opponent_score,
            };

            let leader = if home.score > away.score {
                Some(home.team)
            } else if away.score > home.score {
                Some(away.team)
            } else {
                None
            };

            let result = outcome.period_closed.then(|| leader.map_or(GameResult::Tie, GameResult::Winner));

            Some(LiveGame { period: outcome.period, league: outcome.league, home, away, leader, result })
        })
        .collect();

    games.sort_by_key(|game| (game.league, game.home.team));
    games
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScore {
    pub rank: usize,
    pub team: TeamId,
    pub league: League,
    pub display_name: String,
    pub score: f64,
}

/// The period's scores high to low, optionally for one league only
pub fn weekly_rankings(pool: &ScorePool, registry: &TeamRegistry, league: Option<League>) -> Vec<RankedScore> {
    pool.ranked()
        .into_iter()
        .filter(|(team, _)| league.map_or(true, |l| team.league() == l))
        .enumerate()
        .map(|(index, (team, score))| RankedScore {
            rank: index + 1,
            team,
            league: team.league(),
            display_name: registry.display_name(team),
            score,
        })
        .collect()
}
