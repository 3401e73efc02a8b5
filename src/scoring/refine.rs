//! Multi-pass recursive refinement.
//!
//! Exactly three passes, no convergence test: opponent strength stabilizes
//! fast and a fixed pass count keeps runtime bounded with no oscillation
//! risk. Pass 0 grades against static tier weights; each later pass grades
//! against the previous pass's aggregate SOR, normalized back onto the
//! tier-weight scale. Every pass rebuilds every grade and every team score
//! from scratch into a fresh snapshot; passes never run concurrently because
//! pass N reads the *completed* scores of pass N−1.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::db::models::{Game, Side};
use crate::error::Result;
use crate::tiers::{effective_tier, tier_penalty, tier_weight, TierTable};

use super::defense::DefenseAverages;
use super::grader::{grade_game, GameGrade, Outcome};

/// Fixed pass count: pass 0 (static tiers), passes 1–2 (recursive).
pub const PASS_COUNT: usize = 3;

/// Strength assumed for opponents absent from the previous pass's scores.
const UNKNOWN_STRENGTH: f64 = 0.1;

/// One graded game in a team's final record.
#[derive(Debug, Clone, Serialize)]
pub struct GradedGame {
    pub opponent: String,
    pub season: i32,
    pub week: i32,
    pub points_for: i32,
    pub points_against: i32,
    /// Opponent strength used for this pass, on the tier-weight scale.
    pub opponent_strength: f64,
    pub opponent_tier: u8,
    pub grade: GameGrade,
}

/// A team's full graded record for one pass.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRecord {
    pub team: String,
    /// Tier in the latest season the team appears in the filtered range;
    /// drives the aggregate baseline penalty.
    pub tier: u8,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub point_diff: i64,
    pub games: Vec<GradedGame>,
}

impl TeamRecord {
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Aggregate SOR: mean of game grades plus the tier baseline penalty,
    /// applied once here rather than per game.
    pub fn sor(&self) -> f64 {
        if self.games.is_empty() {
            return tier_penalty(self.tier);
        }
        let mean =
            self.games.iter().map(|g| g.grade.value).sum::<f64>() / self.games.len() as f64;
        mean + tier_penalty(self.tier)
    }

    pub fn win_pct(&self) -> f64 {
        let total = self.wins + self.losses + self.ties;
        if total == 0 {
            0.0
        } else {
            self.wins as f64 / total as f64
        }
    }
}

/// Map a pass's aggregate SOR onto the [0.01, 1.0] tier-weight scale.
pub fn normalize_sor(sor: f64) -> f64 {
    ((sor + 50.0) / 150.0).clamp(0.01, 1.0)
}

pub struct RefinementEngine<'a> {
    games: &'a [Game],
    tiers: &'a TierTable,
    defense: &'a DefenseAverages,
}

impl<'a> RefinementEngine<'a> {
    pub fn new(games: &'a [Game], tiers: &'a TierTable, defense: &'a DefenseAverages) -> Self {
        RefinementEngine {
            games,
            tiers,
            defense,
        }
    }

    /// Run all passes over the filtered game set. Empty input yields an empty
    /// result, never an error.
    pub fn run(&self) -> Result<Vec<TeamRecord>> {
        let mut records: Vec<TeamRecord> = Vec::new();
        let mut prev_scores: Option<HashMap<String, f64>> = None;

        for pass in 0..PASS_COUNT {
            records = self.run_pass(prev_scores.as_ref())?;
            debug!(pass, teams = records.len(), "refinement pass complete");
            // Fresh immutable snapshot for the next pass
            prev_scores = Some(records.iter().map(|r| (r.team.clone(), r.sor())).collect());
        }
        Ok(records)
    }

    /// Run a single pass against the given predecessor scores (None = pass 0).
    fn run_pass(&self, prev: Option<&HashMap<String, f64>>) -> Result<Vec<TeamRecord>> {
        let mut by_team: HashMap<String, TeamRecord> = HashMap::new();

        for g in self.games {
            for side in [Side::Home, Side::Away] {
                let team = match side {
                    Side::Home => &g.home_team,
                    Side::Away => &g.away_team,
                };
                let opponent = g.opponent_of(side);
                let (points_for, points_against) = g.scores_for(side);

                let my_tier = self.tiers.tier(team, g.season)?;
                let opp_tier = self.tiers.tier(opponent, g.season)?;
                let strength = self.opponent_strength(prev, opponent, opp_tier);

                let grade = grade_game(
                    points_for,
                    points_against,
                    side == Side::Home,
                    my_tier,
                    effective_tier(strength),
                    self.defense.average_allowed(opponent, g.season),
                );

                let record = by_team.entry(team.clone()).or_insert_with(|| TeamRecord {
                    team: team.clone(),
                    tier: my_tier,
                    wins: 0,
                    losses: 0,
                    ties: 0,
                    point_diff: 0,
                    games: Vec::new(),
                });
                match grade.outcome {
                    Outcome::Win => record.wins += 1,
                    Outcome::Loss => record.losses += 1,
                    Outcome::Tie => record.ties += 1,
                }
                record.point_diff += (points_for - points_against) as i64;
                record.games.push(GradedGame {
                    opponent: opponent.to_string(),
                    season: g.season,
                    week: g.week,
                    points_for,
                    points_against,
                    opponent_strength: strength,
                    opponent_tier: opp_tier,
                    grade,
                });
            }
        }

        // The per-game tier above is season-local; the aggregate penalty uses
        // the latest season's tier.
        for record in by_team.values_mut() {
            if let Some(t) = self.tiers.latest_tier(&record.team) {
                record.tier = t;
            }
        }

        let mut records: Vec<TeamRecord> = by_team.into_values().collect();
        records.sort_by(|a, b| a.team.cmp(&b.team));
        Ok(records)
    }

    fn opponent_strength(
        &self,
        prev: Option<&HashMap<String, f64>>,
        opponent: &str,
        opp_tier: u8,
    ) -> f64 {
        match prev {
            None => tier_weight(opp_tier),
            Some(scores) => scores
                .get(opponent)
                .map(|&sor| normalize_sor(sor))
                .unwrap_or(UNKNOWN_STRENGTH),
        }
    }
}
