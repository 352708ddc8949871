use crate::config::EspnLeagueConfig;
use league_registry::{League, Team, TeamId};
use scoring_engine::{MatchupPair, Period, ScoreSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// League endpoint response. Which parts are filled depends on the `view`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueResponse {
    #[serde(default)]
    pub teams: Vec<EspnTeam>,

    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnTeam {
    pub id: u32,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default)]
    pub primary_owner: Option<String>,

    #[serde(default)]
    pub roster: Option<Roster>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Roster {
    #[serde(default)]
    pub entries: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(default = "unassigned_slot")]
    pub lineup_slot_id: i32,

    #[serde(default)]
    pub player_pool_entry: Option<PlayerPoolEntry>,
}

fn unassigned_slot() -> i32 {
    -1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPoolEntry {
    #[serde(default)]
    pub applied_stat_total: f64,

    #[serde(default)]
    pub player: Option<EspnPlayer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnPlayer {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default)]
    pub matchup_period_id: u32,

    #[serde(default)]
    pub home: Option<MatchupSide>,

    #[serde(default)]
    pub away: Option<MatchupSide>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupSide {
    #[serde(default)]
    pub team_id: Option<u32>,
}

impl MatchupSide {
    fn team(side: &Option<MatchupSide>) -> Option<u32> {
        side.as_ref().and_then(|s| s.team_id).filter(|id| *id != 0)
    }
}

/// One rostered player and the slot they occupy this week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSlot {
    pub slot_id: i32,
    pub player: String,
    pub points: f64,
    pub starter: bool,
}

impl EspnTeam {
    /// Every rostered player with their slot, starters first
    pub fn lineup(&self, starting_slots: &[i32]) -> Vec<LineupSlot> {
        let mut slots: Vec<LineupSlot> = self
            .roster
            .iter()
            .flat_map(|roster| roster.entries.iter())
            .filter_map(|entry| {
                let pool = entry.player_pool_entry.as_ref()?;
                Some(LineupSlot {
                    slot_id: entry.lineup_slot_id,
                    player: pool
                        .player
                        .as_ref()
                        .and_then(|p| p.full_name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    points: pool.applied_stat_total,
                    starter: starting_slots.contains(&entry.lineup_slot_id),
                })
            })
            .collect();

        slots.sort_by_key(|slot| (!slot.starter, slot.slot_id));
        slots
    }

    /// Points from players in starting slots only
    pub fn starting_score(&self, starting_slots: &[i32]) -> f64 {
        self.lineup(starting_slots).iter().filter(|slot| slot.starter).map(|slot| slot.points).sum()
    }
}

impl LeagueResponse {
    /// Teams from an `mTeam` response, namespaced into `league`
    pub fn to_teams(&self, league: League, config: &EspnLeagueConfig) -> Vec<Team> {
        self.teams.iter().map(|team| Team::new(team.id, config.manager_name(team.id), league)).collect()
    }

    /// Starting-lineup totals from an `mRoster` response
    pub fn to_scores(&self, league: League, starting_slots: &[i32]) -> anyhow::Result<ScoreSnapshot> {
        let mut snapshot = ScoreSnapshot::empty(league);

        for team in &self.teams {
            let id = TeamId::namespace(team.id, league);
            let mut score = team.starting_score(starting_slots);

            if score < 0.0 {
                warn!("{} has a negative total ({:.2}); recording 0", id, score);
                score = 0.0;
            }

            debug!("{}: {:.2} points from starters", id, score);
            for slot in team.lineup(starting_slots) {
                debug!(
                    "  {} slot {:>2} {:<24} {:>6.2}{}",
                    id,
                    slot.slot_id,
                    slot.player,
                    slot.points,
                    if slot.starter { "" } else { " (bench)" }
                );
            }
            snapshot.insert(id, score)?;
        }

        Ok(snapshot)
    }

    /// The period's games from an `mMatchup` response. Byes and games with
    /// a missing side are skipped.
    pub fn to_matchups(&self, league: League, period: Period) -> Vec<MatchupPair> {
        self.schedule
            .iter()
            .filter(|game| game.matchup_period_id == period)
            .filter_map(|game| {
                let home = MatchupSide::team(&game.home)?;
                let away = MatchupSide::team(&game.away)?;
                Some(MatchupPair::new(
                    period,
                    TeamId::namespace(home, league),
                    TeamId::namespace(away, league),
                    league,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STARTERS: [i32; 7] = [0, 6, 11, 14, 18, 19, 23];

    fn roster_response() -> LeagueResponse {
        serde_json::from_value(json!({
            "teams": [
                {
                    "id": 1,
                    "location": "Team",
                    "nickname": "One",
                    "roster": { "entries": [
                        { "lineupSlotId": 0, "playerPoolEntry": { "appliedStatTotal": 21.5, "player": { "fullName": "QB One" } } },
                        { "lineupSlotId": 23, "playerPoolEntry": { "appliedStatTotal": 10.25 } },
                        { "lineupSlotId": 20, "playerPoolEntry": { "appliedStatTotal": 30.0 } },
                        { "playerPoolEntry": { "appliedStatTotal": 99.0 } }
                    ]}
                },
                { "id": 2, "roster": { "entries": [] } },
                {
                    "id": 3,
                    "roster": { "entries": [
                        { "lineupSlotId": 19, "playerPoolEntry": { "appliedStatTotal": -4.0 } }
                    ]}
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_scores_count_starters_only() {
        let snapshot = roster_response().to_scores(League::Red, &STARTERS).unwrap();

        assert_eq!(snapshot.league(), League::Red);
        assert_eq!(snapshot.score(TeamId::namespace(1, League::Red)), Some(31.75));
        assert_eq!(snapshot.score(TeamId::namespace(2, League::Red)), Some(0.0));
        assert_eq!(snapshot.score(TeamId::namespace(3, League::Red)), Some(0.0));
    }

    #[test]
    fn test_lineup_lists_starters_before_bench() {
        let response = roster_response();
        let lineup = response.teams[0].lineup(&STARTERS);

        let slots: Vec<(i32, bool)> = lineup.iter().map(|s| (s.slot_id, s.starter)).collect();
        assert_eq!(slots, vec![(0, true), (23, true), (-1, false), (20, false)]);
        assert_eq!(lineup[0].player, "QB One");
        assert_eq!(lineup[1].player, "Unknown");
        assert_eq!(response.teams[0].starting_score(&STARTERS), 31.75);
        assert!(response.teams[1].lineup(&STARTERS).is_empty());
    }

    #[test]
    fn test_teams_use_manager_names() {
        let response: LeagueResponse =
            serde_json::from_value(json!({ "teams": [ { "id": 2 }, { "id": 7 } ] })).unwrap();
        let mut config = EspnLeagueConfig::default();
        config.managers.insert("2".to_string(), "Andrew Lupario".to_string());

        let teams = response.to_teams(League::Brown, &config);
        assert_eq!(teams[0], Team::new(2, "Andrew Lupario", League::Brown));
        assert_eq!(teams[1].display_name, "Team 7");
        assert_eq!(teams[1].identity, TeamId::namespace(7, League::Brown));
    }

    #[test]
    fn test_matchups_for_period() {
        let response: LeagueResponse = serde_json::from_value(json!({
            "schedule": [
                { "matchupPeriodId": 3, "home": { "teamId": 1 }, "away": { "teamId": 2 } },
                { "matchupPeriodId": 3, "home": { "teamId": 3 } },
                { "matchupPeriodId": 3, "home": { "teamId": 0 }, "away": { "teamId": 4 } },
                { "matchupPeriodId": 4, "home": { "teamId": 5 }, "away": { "teamId": 6 } }
            ]
        }))
        .unwrap();

        let pairs = response.to_matchups(League::Brown, 3);
        assert_eq!(
            pairs,
            vec![MatchupPair::new(3, TeamId::namespace(1, League::Brown), TeamId::namespace(2, League::Brown), League::Brown)]
        );
        assert!(response.to_matchups(League::Brown, 9).is_empty());
    }

    #[test]
    fn test_missing_sections_parse_empty() {
        let response: LeagueResponse = serde_json::from_value(json!({ "id": 1732780114 })).unwrap();
        assert!(response.teams.is_empty());
        assert!(response.schedule.is_empty());
    }
}
