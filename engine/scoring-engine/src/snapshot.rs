use crate::error::{Result, ScoringError};
use league_registry::{League, TeamId};
use std::collections::{BTreeMap, BTreeSet};

/// One league's scores for one period
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSnapshot {
    league: League,
    scores: BTreeMap<TeamId, f64>,
}

impl ScoreSnapshot {
    /// An empty snapshot, meaning the source had nothing for the period
    pub fn empty(league: League) -> Self {
        Self { league, scores: BTreeMap::new() }
    }

    pub fn from_scores(league: League, scores: impl IntoIterator<Item = (TeamId, f64)>) -> Result<Self> {
        let mut snapshot = Self::empty(league);
        for (team, score) in scores {
            snapshot.insert(team, score)?;
        }
        Ok(snapshot)
    }

    /// Record a team's score. Only teams of this snapshot's league are
    /// accepted and the score must be a finite, non-negative number.
    pub fn insert(&mut self, team: TeamId, score: f64) -> Result<()> {
        if team.league() != self.league {
            return Err(ScoringError::ForeignTeam { team, snapshot: self.league });
        }
        if !score.is_finite() || score < 0.0 {
            return Err(ScoringError::InvalidScore { team, score });
        }

        self.scores.insert(team, score);
        Ok(())
    }

    pub fn league(&self) -> League {
        self.league
    }

    pub fn score(&self, team: TeamId) -> Option<f64> {
        self.scores.get(&team).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, f64)> + '_ {
        self.scores.iter().map(|(id, score)| (*id, *score))
    }

    /// Merge the two league snapshots into one pool
    pub fn combine(brown: &ScoreSnapshot, red: &ScoreSnapshot) -> Result<ScorePool> {
        let mut scores = brown.scores.clone();

        for (team, score) in &red.scores {
            if scores.insert(*team, *score).is_some() {
                return Err(ScoringError::NamespaceCollision { team: *team });
            }
        }

        Ok(ScorePool { scores })
    }
}

/// Both leagues' scores for one period, keyed by namespaced identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScorePool {
    scores: BTreeMap<TeamId, f64>,
}

impl ScorePool {
    pub fn score(&self, team: TeamId) -> Option<f64> {
        self.scores.get(&team).copied()
    }

    pub fn contains(&self, team: TeamId) -> bool {
        self.scores.contains_key(&team)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scores sorted high to low; equal scores fall back to identity order
    pub fn ranked(&self) -> Vec<(TeamId, f64)> {
        let mut ranked: Vec<(TeamId, f64)> = self.scores.iter().map(|(id, s)| (*id, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Teams placing in the top `n`. The cutoff is score based: every team
    /// tied with the n-th highest score is included.
    pub fn top_n(&self, n: usize) -> BTreeSet<TeamId> {
        if n == 0 {
            return BTreeSet::new();
        }

        let ranked = self.ranked();
        if ranked.len() <= n {
            return ranked.into_iter().map(|(id, _)| id).collect();
        }

        let cutoff = ranked[n - 1].1;
        ranked.into_iter().take_while(|(_, score)| *score >= cutoff).map(|(id, _)| id).collect()
    }
}
