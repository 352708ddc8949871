//! Typed access to the league collections in a [`CollectionStore`]

use crate::error::{Result, ScoringError};
use crate::models::{CrossPairing, Period, WeeklyOutcome};
use league_registry::{Team, TeamRegistry};
use persistence::{read_records, write_records, CollectionStore, PersistenceError};
use std::collections::HashSet;
use tracing::{debug, info};

pub const TEAMS_COLLECTION: &str = "teams";
pub const CROSS_MATCHUPS_COLLECTION: &str = "cross_matchups";
pub const WEEKLY_OUTCOMES_COLLECTION: &str = "weekly_outcomes";

/// Teams, cross pairings and weekly outcome history.
///
/// Every record is validated when read; a record whose league disagrees with
/// its identity is rejected rather than repaired.
pub struct LeagueStore<S> {
    store: S,
}

impl<S: CollectionStore> LeagueStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub async fn load_teams(&self) -> Result<Vec<Team>> {
        let teams: Vec<Team> = read_records(&self.store, TEAMS_COLLECTION).await?;

        for (row, team) in teams.iter().enumerate() {
            if team.identity.league() != team.league {
                return Err(PersistenceError::malformed(
                    TEAMS_COLLECTION,
                    row,
                    format!("league '{}' disagrees with identity {}", team.league, team.identity),
                )
                .into());
            }
        }

        Ok(teams)
    }

    /// Load the stored team list as a registry
    pub async fn load_registry(&self) -> Result<TeamRegistry> {
        let teams = self.load_teams().await?;
        Ok(TeamRegistry::from_teams(teams)?)
    }

    /// Replace the stored team list. The list must form a valid registry.
    pub async fn save_teams(&self, teams: &[Team]) -> Result<()> {
        TeamRegistry::from_teams(teams.iter().cloned())?;
        write_records(&self.store, TEAMS_COLLECTION, teams).await?;
        info!("Saved {} teams", teams.len());
        Ok(())
    }

    pub async fn load_cross_pairings(&self) -> Result<Vec<CrossPairing>> {
        let pairings: Vec<CrossPairing> = read_records(&self.store, CROSS_MATCHUPS_COLLECTION).await?;

        for (row, pairing) in pairings.iter().enumerate() {
            pairing
                .validate()
                .map_err(|reason| PersistenceError::malformed(CROSS_MATCHUPS_COLLECTION, row, reason))?;
        }

        Ok(pairings)
    }

    /// Store a pairing. Any pairing for the same period that already involves
    /// either team is replaced.
    pub async fn add_cross_pairing(&self, pairing: CrossPairing) -> Result<Vec<CrossPairing>> {
        pairing.validate().map_err(ScoringError::InvalidPairing)?;

        let mut pairings = self.load_cross_pairings().await?;
        let before = pairings.len();
        pairings.retain(|existing| {
            existing.period != pairing.period
                || (existing.brown_side != pairing.brown_side && existing.red_side != pairing.red_side)
        });
        if pairings.len() < before {
            info!(
                "Replacing {} cross pairing(s) involving {} or {}",
                before - pairings.len(),
                pairing.brown_side,
                pairing.red_side
            );
        }

        pairings.push(pairing);
        pairings.sort_by(|a, b| (a.period, a.brown_side).cmp(&(b.period, b.brown_side)));

        write_records(&self.store, CROSS_MATCHUPS_COLLECTION, &pairings).await?;
        Ok(pairings)
    }

    /// Stored outcomes, optionally for one period only
    pub async fn get_weekly_outcomes(&self, period: Option<Period>) -> Result<Vec<WeeklyOutcome>> {
        let outcomes: Vec<WeeklyOutcome> = read_records(&self.store, WEEKLY_OUTCOMES_COLLECTION).await?;

        for (row, outcome) in outcomes.iter().enumerate() {
            outcome
                .validate()
                .map_err(|reason| PersistenceError::malformed(WEEKLY_OUTCOMES_COLLECTION, row, reason))?;
        }

        Ok(match period {
            Some(period) => outcomes.into_iter().filter(|o| o.period == period).collect(),
            None => outcomes,
        })
    }

    /// Replace every stored row for `period` with `rows`, leaving other
    /// periods untouched. History is kept sorted by period then team, so
    /// repeating the same upsert rewrites identical content.
    pub async fn upsert_weekly_outcomes(&self, period: Period, rows: &[WeeklyOutcome]) -> Result<()> {
        let mut seen = HashSet::new();
        for row in rows {
            if row.period != period {
                return Err(ScoringError::PeriodMismatch {
                    team: row.team_identity,
                    expected: period,
                    found: row.period,
                });
            }
            row.validate().map_err(|reason| ScoringError::InvalidOutcome { team: row.team_identity, reason })?;
            if !seen.insert(row.team_identity) {
                return Err(ScoringError::InvalidOutcome {
                    team: row.team_identity,
                    reason: format!("listed twice for period {period}"),
                });
            }
        }

        let mut history = self.get_weekly_outcomes(None).await?;
        let before = history.len();
        history.retain(|o| o.period != period);
        let replaced = before - history.len();

        history.extend(rows.iter().cloned());
        history.sort_by(|a, b| (a.period, a.team_identity).cmp(&(b.period, b.team_identity)));

        write_records(&self.store, WEEKLY_OUTCOMES_COLLECTION, &history).await?;

        debug!("Period {}: replaced {} rows with {}", period, replaced, rows.len());
        info!("💾 Stored {} outcomes for period {} ({} rows in history)", rows.len(), period, history.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_registry::{League, TeamId};
    use persistence::InMemoryPersistence;
    use serde_json::json;

    fn outcome(period: Period, team: TeamId) -> WeeklyOutcome {
        WeeklyOutcome {
            period,
            team_identity: team,
            league: team.league(),
            score: 100.0,
            intra_opponent: None,
            intra_opponent_score: 0.0,
            cross_opponent: None,
            cross_opponent_score: 0.0,
            intra_points: 0.0,
            cross_points: 0.0,
            top_n_points: 1.0,
            total_points: 1.0,
            total_losses: 2.0,
            period_closed: true,
        }
    }

    #[tokio::test]
    async fn test_teams_roundtrip() {
        let store = LeagueStore::new(InMemoryPersistence::default());
        let teams = vec![Team::new(1, "Andrew", League::Brown), Team::new(1, "Brad", League::Red)];

        store.save_teams(&teams).await.unwrap();
        let registry = store.load_registry().await.unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("Brad", League::Red).unwrap(), TeamId::namespace(1, League::Red));
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_names() {
        let store = LeagueStore::new(InMemoryPersistence::default());
        let teams = vec![Team::new(1, "Andrew", League::Brown), Team::new(2, "Andrew", League::Brown)];
        assert!(matches!(store.save_teams(&teams).await, Err(ScoringError::Registry(_))));
    }

    #[tokio::test]
    async fn test_team_with_conflicting_league_is_rejected() {
        let backend = InMemoryPersistence::default();
        backend
            .write_collection(TEAMS_COLLECTION, vec![json!({"identity": "red-1", "display_name": "X", "league": "brown"})])
            .await
            .unwrap();

        let store = LeagueStore::new(backend);
        let err = store.load_teams().await.unwrap_err();
        assert!(matches!(err, ScoringError::Store(PersistenceError::MalformedRecord { row: 0, .. })));
    }

    #[tokio::test]
    async fn test_outcome_without_league_is_rejected() {
        let backend = InMemoryPersistence::default();
        let mut row = serde_json::to_value(outcome(1, TeamId::namespace(1, League::Brown))).unwrap();
        row.as_object_mut().unwrap().remove("league");
        backend.write_collection(WEEKLY_OUTCOMES_COLLECTION, vec![row]).await.unwrap();

        let store = LeagueStore::new(backend);
        assert!(store.get_weekly_outcomes(None).await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_replaces_only_its_period() {
        let store = LeagueStore::new(InMemoryPersistence::default());
        let a = TeamId::namespace(1, League::Brown);
        let b = TeamId::namespace(1, League::Red);

        store.upsert_weekly_outcomes(1, &[outcome(1, a), outcome(1, b)]).await.unwrap();
        store.upsert_weekly_outcomes(2, &[outcome(2, a)]).await.unwrap();

        let mut replacement = outcome(1, a);
        replacement.score = 42.0;
        store.upsert_weekly_outcomes(1, &[replacement.clone()]).await.unwrap();

        assert_eq!(store.get_weekly_outcomes(Some(1)).await.unwrap(), vec![replacement]);
        assert_eq!(store.get_weekly_outcomes(Some(2)).await.unwrap(), vec![outcome(2, a)]);
        assert_eq!(store.get_weekly_outcomes(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_rejects_rows_from_other_periods() {
        let store = LeagueStore::new(InMemoryPersistence::default());
        let err = store
            .upsert_weekly_outcomes(3, &[outcome(2, TeamId::namespace(1, League::Brown))])
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::PeriodMismatch { expected: 3, found: 2, .. }));
    }

    #[tokio::test]
    async fn test_upsert_rejects_duplicate_teams() {
        let store = LeagueStore::new(InMemoryPersistence::default());
        let a = TeamId::namespace(1, League::Brown);
        assert!(store.upsert_weekly_outcomes(1, &[outcome(1, a), outcome(1, a)]).await.is_err());
    }

    #[tokio::test]
    async fn test_add_cross_pairing_replaces_conflicts() {
        let store = LeagueStore::new(InMemoryPersistence::default());
        let b1 = TeamId::namespace(1, League::Brown);
        let r1 = TeamId::namespace(1, League::Red);
        let r2 = TeamId::namespace(2, League::Red);

        store.add_cross_pairing(CrossPairing::new(b1, r1, None).unwrap()).await.unwrap();
        store.add_cross_pairing(CrossPairing::new(b1, r2, Some(5)).unwrap()).await.unwrap();
        let pairings = store.add_cross_pairing(CrossPairing::new(b1, r2, None).unwrap()).await.unwrap();

        assert_eq!(pairings.len(), 2);
        assert_eq!(store.load_cross_pairings().await.unwrap(), pairings);
        assert!(pairings.contains(&CrossPairing::new(b1, r2, None).unwrap()));
        assert!(!pairings.contains(&CrossPairing::new(b1, r1, None).unwrap()));
    }
}
