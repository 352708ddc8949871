use crate::models::WeeklyOutcome;
use league_registry::{League, TeamId, TeamRegistry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A team's season to date, summed over its weekly outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStandingsRow {
    /// 1-based; 0 until ranked
    pub rank: usize,
    pub team_identity: TeamId,
    pub league: League,
    pub display_name: String,
    pub periods: u32,
    pub intra_points: f64,
    pub cross_points: f64,
    pub top_n_points: f64,
    pub total_points: f64,
    pub total_losses: f64,
    pub score: f64,
}

impl SeasonStandingsRow {
    pub fn from_outcome(outcome: &WeeklyOutcome) -> Self {
        Self {
            rank: 0,
            team_identity: outcome.team_identity,
            league: outcome.league,
            display_name: outcome.team_identity.to_string(),
            periods: 1,
            intra_points: outcome.intra_points,
            cross_points: outcome.cross_points,
            top_n_points: outcome.top_n_points,
            total_points: outcome.total_points,
            total_losses: outcome.total_losses,
            score: outcome.score,
        }
    }

    /// Fold another partial total for the same team into this one
    pub fn merge(&mut self, other: &SeasonStandingsRow) {
        debug_assert_eq!(self.team_identity, other.team_identity);

        self.periods += other.periods;
        self.intra_points += other.intra_points;
        self.cross_points += other.cross_points;
        self.top_n_points += other.top_n_points;
        self.total_points += other.total_points;
        self.total_losses += other.total_losses;
        self.score += other.score;
    }
}

/// Group-by-sum of weekly outcomes into season standings
pub struct StandingsAggregator;

impl StandingsAggregator {
    /// Sum outcomes per team. With a league only that league's rows count.
    /// Rows come back unranked, ordered by identity.
    pub fn aggregate<'a>(
        outcomes: impl IntoIterator<Item = &'a WeeklyOutcome>,
        league: Option<League>,
    ) -> Vec<SeasonStandingsRow> {
        let partials = outcomes
            .into_iter()
            .filter(|outcome| league.map_or(true, |l| outcome.league == l))
            .map(SeasonStandingsRow::from_outcome);

        Self::combine(partials)
    }

    /// Merge partial totals, e.g. aggregates over disjoint sets of periods
    pub fn combine(rows: impl IntoIterator<Item = SeasonStandingsRow>) -> Vec<SeasonStandingsRow> {
        let mut by_team: BTreeMap<TeamId, SeasonStandingsRow> = BTreeMap::new();

        for row in rows {
            match by_team.get_mut(&row.team_identity) {
                Some(existing) => existing.merge(&row),
                None => {
                    by_team.insert(row.team_identity, row);
                }
            }
        }

        by_team.into_values().collect()
    }

    /// Order by total points, then summed score, both descending. Teams
    /// still level keep identity order. Ranks are assigned 1..=len.
    pub fn rank(mut rows: Vec<SeasonStandingsRow>) -> Vec<SeasonStandingsRow> {
        rows.sort_by(standings_order);
        for (index, row) in rows.iter_mut().enumerate() {
            row.rank = index + 1;
        }
        rows
    }

    /// Aggregate, name and rank in one step
    pub fn standings<'a>(
        outcomes: impl IntoIterator<Item = &'a WeeklyOutcome>,
        league: Option<League>,
        registry: &TeamRegistry,
    ) -> Vec<SeasonStandingsRow> {
        let mut rows = Self::aggregate(outcomes, league);
        for row in &mut rows {
            row.display_name = registry.display_name(row.team_identity);
        }
        Self::rank(rows)
    }
}

fn standings_order(a: &SeasonStandingsRow, b: &SeasonStandingsRow) -> Ordering {
    b.total_points
        .total_cmp(&a.total_points)
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.team_identity.cmp(&b.team_identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_registry::Team;

    fn outcome(period: u32, team: TeamId, score: f64, points: [f64; 3]) -> WeeklyOutcome {
        let total: f64 = points.iter().sum();
        WeeklyOutcome {
            period,
            team_identity: team,
            league: team.league(),
            score,
            intra_opponent: None,
            intra_opponent_score: 0.0,
            cross_opponent: None,
            cross_opponent_score: 0.0,
            intra_points: points[0],
            cross_points: points[1],
            top_n_points: points[2],
            total_points: total,
            total_losses: 3.0 - total,
            period_closed: true,
        }
    }

    #[test]
    fn test_sums_per_team() {
        let a = TeamId::namespace(1, League::Brown);
        let rows = vec![outcome(1, a, 100.0, [1.0, 0.0, 1.0]), outcome(2, a, 90.5, [0.0, 1.0, 1.0])];

        let standings = StandingsAggregator::aggregate(&rows, None);
        assert_eq!(standings.len(), 1);

        let row = &standings[0];
        assert_eq!(row.periods, 2);
        assert_eq!(row.intra_points, 1.0);
        assert_eq!(row.cross_points, 1.0);
        assert_eq!(row.top_n_points, 2.0);
        assert_eq!(row.total_points, 4.0);
        assert_eq!(row.total_losses, 2.0);
        assert_eq!(row.score, 190.5);
    }

    #[test]
    fn test_league_filter() {
        let rows = vec![
            outcome(1, TeamId::namespace(1, League::Brown), 10.0, [1.0, 0.0, 0.0]),
            outcome(1, TeamId::namespace(1, League::Red), 20.0, [1.0, 0.0, 0.0]),
        ];

        let red = StandingsAggregator::aggregate(&rows, Some(League::Red));
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].league, League::Red);
        assert_eq!(StandingsAggregator::aggregate(&rows, None).len(), 2);
    }

    #[test]
    fn test_rank_tie_breaks() {
        let a = TeamId::namespace(1, League::Brown);
        let b = TeamId::namespace(2, League::Brown);
        let c = TeamId::namespace(1, League::Red);
        let d = TeamId::namespace(3, League::Brown);
        let rows = vec![
            outcome(1, a, 100.0, [1.0, 0.0, 1.0]),
            outcome(1, b, 120.0, [1.0, 0.0, 1.0]),
            outcome(1, c, 120.0, [1.0, 0.0, 1.0]),
            outcome(1, d, 150.0, [0.0, 0.0, 1.0]),
        ];

        let ranked = StandingsAggregator::rank(StandingsAggregator::aggregate(&rows, None));
        let order: Vec<(usize, TeamId)> = ranked.iter().map(|r| (r.rank, r.team_identity)).collect();
        assert_eq!(order, vec![(1, b), (2, c), (3, a), (4, d)]);
    }

    #[test]
    fn test_standings_fill_display_names() {
        let registry = TeamRegistry::from_teams(vec![Team::new(1, "Andrew", League::Brown)]).unwrap();
        let known = TeamId::namespace(1, League::Brown);
        let unknown = TeamId::namespace(9, League::Brown);
        let rows = vec![outcome(1, known, 50.0, [1.0, 0.0, 0.0]), outcome(1, unknown, 10.0, [0.0, 0.0, 0.0])];

        let standings = StandingsAggregator::standings(&rows, None, &registry);
        assert_eq!(standings[0].display_name, "Andrew");
        assert_eq!(standings[1].display_name, "brown-9");
    }
}
