use crate::types::{League, RegistryError, Team, TeamId};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Team Registry - Resolves identities and display names across both leagues
///
/// Built from an explicit team list for each computation; there is no
/// process-wide "current teams" state.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    /// Map from identity to team, ordered by league then native id
    teams_by_id: BTreeMap<TeamId, Team>,

    /// Map from (league, display name) to identity
    ids_by_name: HashMap<(League, String), TeamId>,
}

impl TeamRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a team list, rejecting inconsistent records
    pub fn from_teams(teams: impl IntoIterator<Item = Team>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for team in teams {
            registry.insert(team)?;
        }
        debug!("Built team registry with {} teams", registry.len());
        Ok(registry)
    }

    fn insert(&mut self, team: Team) -> Result<(), RegistryError> {
        if team.identity.league() != team.league {
            return Err(RegistryError::LeagueMismatch {
                identity: team.identity,
                identity_league: team.identity.league(),
                recorded: team.league,
            });
        }

        if self.teams_by_id.contains_key(&team.identity) {
            return Err(RegistryError::DuplicateIdentity(team.identity));
        }

        let name_key = (team.league, team.display_name.clone());
        if self.ids_by_name.contains_key(&name_key) {
            return Err(RegistryError::DuplicateName {
                name: team.display_name.clone(),
                league: team.league,
            });
        }

        self.ids_by_name.insert(name_key, team.identity);
        self.teams_by_id.insert(team.identity, team);
        Ok(())
    }

    /// Namespace a league-local native id
    pub fn namespace(native_id: u32, league: League) -> TeamId {
        TeamId::namespace(native_id, league)
    }

    /// Resolve a display name within one league (exact, case-sensitive match)
    pub fn resolve(&self, display_name: &str, league: League) -> Result<TeamId, RegistryError> {
        self.ids_by_name
            .get(&(league, display_name.to_string()))
            .copied()
            .ok_or_else(|| RegistryError::NotFound { name: display_name.to_string(), league })
    }

    /// Get a team by identity
    pub fn get(&self, id: TeamId) -> Result<&Team, RegistryError> {
        self.teams_by_id.get(&id).ok_or(RegistryError::UnknownTeam(id))
    }

    /// Display name for an identity, falling back to the identity itself
    pub fn display_name(&self, id: TeamId) -> String {
        self.teams_by_id.get(&id).map(|t| t.display_name.clone()).unwrap_or_else(|| id.to_string())
    }

    /// All teams, Brown league first, each by native id
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams_by_id.values()
    }

    /// Teams of one league, by native id
    pub fn league_teams(&self, league: League) -> impl Iterator<Item = &Team> {
        self.teams_by_id.values().filter(move |t| t.league == league)
    }

    pub fn len(&self) -> usize {
        self.teams_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams_by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_teams() -> Vec<Team> {
        vec![
            Team::new(1, "John Van Handel", League::Brown),
            Team::new(2, "Andrew Lupario", League::Brown),
            Team::new(1, "Sam Ortiz", League::Red),
            Team::new(2, "Andrew Lupario", League::Red),
        ]
    }

    #[test]
    fn test_registry_creation() {
        let registry = TeamRegistry::from_teams(create_test_teams()).unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.league_teams(League::Brown).count(), 2);
        assert_eq!(registry.league_teams(League::Red).count(), 2);
    }

    #[test]
    fn test_resolve_is_league_scoped() {
        let registry = TeamRegistry::from_teams(create_test_teams()).unwrap();

        // Same display name in both leagues resolves per partition
        let brown = registry.resolve("Andrew Lupario", League::Brown).unwrap();
        let red = registry.resolve("Andrew Lupario", League::Red).unwrap();
        assert_eq!(brown, TeamId::namespace(2, League::Brown));
        assert_eq!(red, TeamId::namespace(2, League::Red));

        let err = registry.resolve("Sam Ortiz", League::Brown).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { league: League::Brown, .. }));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = TeamRegistry::from_teams(create_test_teams()).unwrap();
        assert!(registry.resolve("john van handel", League::Brown).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut teams = create_test_teams();
        teams.push(Team::new(1, "Someone Else", League::Brown));
        assert_eq!(
            TeamRegistry::from_teams(teams).unwrap_err(),
            RegistryError::DuplicateIdentity(TeamId::namespace(1, League::Brown))
        );

        let mut teams = create_test_teams();
        teams.push(Team::new(9, "John Van Handel", League::Brown));
        assert!(matches!(
            TeamRegistry::from_teams(teams).unwrap_err(),
            RegistryError::DuplicateName { .. }
        ));
    }

    #[test]
    fn test_rejects_league_mismatch() {
        let bad = Team {
            identity: TeamId::namespace(3, League::Red),
            display_name: "Matt Plantz".to_string(),
            league: League::Brown,
        };
        assert!(matches!(
            TeamRegistry::from_teams(vec![bad]).unwrap_err(),
            RegistryError::LeagueMismatch { .. }
        ));
    }

    #[test]
    fn test_teams_ordered_brown_first() {
        let registry = TeamRegistry::from_teams(create_test_teams().into_iter().rev()).unwrap();
        let order: Vec<String> = registry.teams().map(|t| t.identity.to_string()).collect();
        assert_eq!(order, vec!["brown-1", "brown-2", "red-1", "red-2"]);
    }

    #[test]
    fn test_display_name_fallback() {
        let registry = TeamRegistry::from_teams(create_test_teams()).unwrap();
        assert_eq!(registry.display_name(TeamId::namespace(1, League::Red)), "Sam Ortiz");
        assert_eq!(registry.display_name(TeamId::namespace(7, League::Red)), "red-7");
    }
}
