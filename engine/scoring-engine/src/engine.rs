use crate::calculator::{OutcomeInput, PointsCalculator};
use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::matchups::MatchupResolver;
use crate::models::{CrossPairing, MatchupPair, Period, RefreshWarning, WeeklyOutcome};
use crate::snapshot::ScoreSnapshot;
use league_registry::{League, TeamRegistry};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A complete, in-memory snapshot of one period's inputs
pub struct PeriodInput<'a> {
    pub period: Period,
    pub registry: &'a TeamRegistry,
    pub brown_scores: &'a ScoreSnapshot,
    pub red_scores: &'a ScoreSnapshot,
    pub intra_matchups: &'a [MatchupPair],
    pub cross_pairings: &'a [CrossPairing],
    pub period_closed: bool,
}

/// Outcome rows for one period plus whatever inputs had to be degraded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOutcome {
    pub period: Period,
    pub closed: bool,
    pub outcomes: Vec<WeeklyOutcome>,
    pub warnings: Vec<RefreshWarning>,
}

/// Computes weekly outcomes for every registered team
pub struct ScoringEngine {
    config: ScoringConfig,
    calculator: PointsCalculator,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate().map_err(ScoringError::Config)?;
        let calculator = PointsCalculator::new(&config);
        Ok(Self { config, calculator })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one period.
    ///
    /// Rows come out Brown teams first, then Red, each ordered by native id,
    /// so identical inputs always produce identical rows. When neither league
    /// reported any score the result holds no rows.
    pub fn compute_period(&self, input: &PeriodInput<'_>) -> Result<PeriodOutcome> {
        let mut warnings = Vec::new();

        for snapshot in [input.brown_scores, input.red_scores] {
            if snapshot.is_empty() {
                warn!("No {} league scores for period {}", snapshot.league(), input.period);
                warnings.push(RefreshWarning::SourceUnavailable { league: snapshot.league() });
            }
        }

        let pool = ScoreSnapshot::combine(input.brown_scores, input.red_scores)?;

        if pool.is_empty() {
            info!("Period {} has no scores; nothing to record", input.period);
            return Ok(PeriodOutcome { period: input.period, closed: input.period_closed, outcomes: Vec::new(), warnings });
        }

        for snapshot in [input.brown_scores, input.red_scores] {
            for (team, _) in snapshot.iter() {
                if input.registry.get(team).is_err() {
                    warn!("Scored team {} is not registered", team);
                    warnings.push(RefreshWarning::UnregisteredTeam { team });
                }
            }
        }

        let resolver = MatchupResolver::new(
            input.period,
            input.registry,
            input.brown_scores,
            input.red_scores,
            input.intra_matchups,
            input.cross_pairings,
        );
        warnings.extend(resolver.warnings().iter().cloned());

        let top_n = pool.top_n(self.config.top_n);

        let mut outcomes = Vec::with_capacity(input.registry.len());
        for team in input.registry.teams() {
            let id = team.identity;
            let score = pool.score(id);

            if score.is_none() && !league_snapshot(input, team.league).is_empty() {
                warn!("No score for {} ({}) in period {}", team.display_name, id, input.period);
                warnings.push(RefreshWarning::MissingScore { team: id });
            }

            let outcome = self.calculator.compute(&OutcomeInput {
                period: input.period,
                team: id,
                score,
                intra: resolver.resolve_intra(id),
                cross: resolver.resolve_cross(id),
                in_top_n: top_n.contains(&id),
                period_closed: input.period_closed,
            });

            debug!(
                "{} period {}: score {:.2}, intra {}, cross {}, top-n {}",
                id, input.period, outcome.score, outcome.intra_points, outcome.cross_points, outcome.top_n_points
            );

            outcomes.push(outcome);
        }

        info!(
            "📊 Scored period {} ({}): {} teams, {} in top {}, {} warnings",
            input.period,
            if input.period_closed { "closed" } else { "live" },
            outcomes.len(),
            top_n.len(),
            self.config.top_n,
            warnings.len()
        );

        Ok(PeriodOutcome { period: input.period, closed: input.period_closed, outcomes, warnings })
    }
}

fn league_snapshot<'a>(input: &PeriodInput<'a>, league: League) -> &'a ScoreSnapshot {
    match league {
        League::Brown => input.brown_scores,
        League::Red => input.red_scores,
    }
}
