use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two leagues taking part in the competition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum League {
    Brown,
    Red,
}

impl League {
    pub const ALL: [League; 2] = [League::Brown, League::Red];

    /// The league a team of this league plays cross-league games against
    pub fn other(&self) -> League {
        match self {
            League::Brown => League::Red,
            League::Red => League::Brown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            League::Brown => "brown",
            League::Red => "red",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for League {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brown" => Ok(League::Brown),
            "red" => Ok(League::Red),
            other => Err(RegistryError::UnknownLeague(other.to_string())),
        }
    }
}

/// Globally unique team identity: a league-local native id tagged with its league.
///
/// The canonical string form is `"<league>-<native_id>"` (e.g. `brown-3`), which
/// is also how the identity is serialized into stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId {
    league: League,
    native_id: u32,
}

impl TeamId {
    /// Namespace a native id into the combined identity space
    pub fn namespace(native_id: u32, league: League) -> Self {
        Self { league, native_id }
    }

    pub fn league(&self) -> League {
        self.league
    }

    pub fn native_id(&self) -> u32 {
        self.native_id
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.league, self.native_id)
    }
}

impl FromStr for TeamId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (league, native) = s
            .split_once('-')
            .ok_or_else(|| RegistryError::InvalidTeamId(s.to_string()))?;
        let league = league.parse::<League>().map_err(|_| RegistryError::InvalidTeamId(s.to_string()))?;
        let native_id =
            native.parse::<u32>().map_err(|_| RegistryError::InvalidTeamId(s.to_string()))?;
        Ok(Self::namespace(native_id, league))
    }
}

impl TryFrom<String> for TeamId {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeamId> for String {
    fn from(id: TeamId) -> Self {
        id.to_string()
    }
}

/// A fantasy team as known to the competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Namespaced identity
    pub identity: TeamId,

    /// Human-facing name (the manager's name in the reference deployment)
    pub display_name: String,

    /// Owning league; always equal to `identity.league()`
    pub league: League,
}

impl Team {
    /// Create a team from its league-local id
    pub fn new(native_id: u32, display_name: impl Into<String>, league: League) -> Self {
        Self { identity: TeamId::namespace(native_id, league), display_name: display_name.into(), league }
    }
}

/// Errors raised while building or querying the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No team named '{name}' in the {league} league")]
    NotFound { name: String, league: League },

    #[error("Unknown team identity: {0}")]
    UnknownTeam(TeamId),

    #[error("Duplicate team identity: {0}")]
    DuplicateIdentity(TeamId),

    #[error("Duplicate display name '{name}' in the {league} league")]
    DuplicateName { name: String, league: League },

    #[error("Team {identity} is tagged {identity_league} but recorded in the {recorded} league")]
    LeagueMismatch { identity: TeamId, identity_league: League, recorded: League },

    #[error("Unknown league: {0}")]
    UnknownLeague(String),

    #[error("Invalid team identity: {0}")]
    InvalidTeamId(String),
}
