use crate::calculator::HeadToHead;
use crate::models::{CrossPairing, MatchupPair, Period, RefreshWarning};
use crate::snapshot::ScoreSnapshot;
use league_registry::{League, TeamId, TeamRegistry};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolves each team's intra-league and cross-league opponent for one period
pub struct MatchupResolver<'a> {
    period: Period,
    brown_scores: &'a ScoreSnapshot,
    red_scores: &'a ScoreSnapshot,
    intra: HashMap<TeamId, TeamId>,
    cross: HashMap<TeamId, TeamId>,
    warnings: Vec<RefreshWarning>,
}

impl<'a> MatchupResolver<'a> {
    /// Index the period's schedule and cross pairings.
    ///
    /// Entries naming unregistered teams, or scheduling a team twice, are
    /// dropped and reported through [`MatchupResolver::warnings`].
    pub fn new(
        period: Period,
        registry: &TeamRegistry,
        brown_scores: &'a ScoreSnapshot,
        red_scores: &'a ScoreSnapshot,
        intra_matchups: &[MatchupPair],
        cross_pairings: &[CrossPairing],
    ) -> Self {
        let mut resolver = Self {
            period,
            brown_scores,
            red_scores,
            intra: HashMap::new(),
            cross: HashMap::new(),
            warnings: Vec::new(),
        };

        for pair in intra_matchups.iter().filter(|pair| pair.period == period) {
            let foreign = [pair.team_a, pair.team_b].into_iter().find(|team| team.league() != pair.league);
            if let Some(team) = foreign {
                warn!("Dropping period {} matchup: {} is not in the {} league", period, team, pair.league);
                resolver.warnings.push(RefreshWarning::UnknownOpponent { team });
                continue;
            }
            resolver.link(registry, pair.team_a, pair.team_b, false);
        }

        for pairing in current_cross_pairings(cross_pairings, period) {
            if let Err(reason) = pairing.validate() {
                warn!("Dropping cross pairing for period {}: {}", period, reason);
                continue;
            }
            resolver.link(registry, pairing.brown_side, pairing.red_side, true);
        }

        debug!(
            "Resolved period {}: {} intra games, {} cross games",
            period,
            resolver.intra.len() / 2,
            resolver.cross.len() / 2
        );

        resolver
    }

    fn link(&mut self, registry: &TeamRegistry, a: TeamId, b: TeamId, cross: bool) {
        if a == b {
            warn!("Dropping period {} matchup of {} against itself", self.period, a);
            self.warnings.push(RefreshWarning::ScheduleConflict { team: a, period: self.period });
            return;
        }

        let unknown: Vec<TeamId> = [a, b].into_iter().filter(|team| registry.get(*team).is_err()).collect();
        if !unknown.is_empty() {
            for team in unknown {
                warn!("Period {} matchup names unknown team {}", self.period, team);
                self.warnings.push(RefreshWarning::UnknownOpponent { team });
            }
            return;
        }

        let period = self.period;
        let games = if cross { &mut self.cross } else { &mut self.intra };

        let conflicted: Vec<TeamId> = [a, b].into_iter().filter(|team| games.contains_key(team)).collect();
        if !conflicted.is_empty() {
            for team in conflicted {
                warn!("{} is scheduled more than once in period {}", team, period);
                self.warnings.push(RefreshWarning::ScheduleConflict { team, period });
            }
            return;
        }

        games.insert(a, b);
        games.insert(b, a);
    }

    fn snapshot(&self, league: League) -> &ScoreSnapshot {
        match league {
            League::Brown => self.brown_scores,
            League::Red => self.red_scores,
        }
    }

    fn head_to_head(&self, opponent: Option<TeamId>) -> HeadToHead {
        let opponent_score = opponent
            .and_then(|opp| self.snapshot(opp.league()).score(opp))
            .unwrap_or(0.0);
        HeadToHead { opponent, opponent_score }
    }

    /// The team's opponent from its own league's schedule. The opponent's
    /// score comes from that league's snapshot, 0 when absent.
    pub fn resolve_intra(&self, team: TeamId) -> HeadToHead {
        self.head_to_head(self.intra.get(&team).copied())
    }

    /// The team's cross-league opponent, scored from the other league's snapshot
    pub fn resolve_cross(&self, team: TeamId) -> HeadToHead {
        self.head_to_head(self.cross.get(&team).copied())
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn warnings(&self) -> &[RefreshWarning] {
        &self.warnings
    }

    /// Every intra-league game of the period, each listed once
    pub fn intra_games(&self) -> Vec<(TeamId, TeamId)> {
        let mut games: Vec<(TeamId, TeamId)> =
            self.intra.iter().filter(|(a, b)| a < b).map(|(a, b)| (*a, *b)).collect();
        games.sort();
        games
    }
}

/// Pairings in force for a period: its own pairings when it has any,
/// otherwise the season-wide ones
pub fn current_cross_pairings(pairings: &[CrossPairing], period: Period) -> Vec<&CrossPairing> {
    let specific: Vec<&CrossPairing> = pairings.iter().filter(|p| p.period == Some(period)).collect();
    if !specific.is_empty() {
        return specific;
    }

    pairings.iter().filter(|p| p.period.is_none()).collect()
}
