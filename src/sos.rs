//! Strength of schedule.
//!
//! A simpler companion metric to the SOR engine: average opponent winning
//! percentage, weighted by the opponent's division so an FCS slate doesn't
//! read as hard as a power slate. Works per season, straight off win-loss
//! records, with no refinement passes.

use std::collections::HashMap;

use crate::db::models::{Game, Side};

pub const SOS_MIN_GAMES: usize = 3;
pub const SOS_LEADERBOARD_MIN_GAMES: usize = 10;

const DIVISION_WEIGHTS: [(&str, f64); 4] =
    [("fbs", 1.0), ("fcs", 0.6), ("ii", 0.4), ("iii", 0.2)];
const UNKNOWN_DIVISION_WEIGHT: f64 = 0.5;

fn division_weight(classification: Option<&str>) -> f64 {
    classification
        .and_then(|c| {
            DIVISION_WEIGHTS
                .iter()
                .find(|(name, _)| c.eq_ignore_ascii_case(name))
                .map(|(_, w)| *w)
        })
        .unwrap_or(UNKNOWN_DIVISION_WEIGHT)
}

#[derive(Debug, Clone, Default)]
struct SeasonRecord {
    wins: u32,
    losses: u32,
    ties: u32,
}

impl SeasonRecord {
    fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Ties count half, the usual convention.
    fn win_pct(&self) -> f64 {
        let n = self.games();
        if n == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.ties as f64 * 0.5) / n as f64
    }
}

#[derive(Debug, Clone)]
pub struct SosEntry {
    pub team: String,
    pub season: i32,
    /// 0-100 scale, higher is a harder schedule.
    pub sos: f64,
    pub games: usize,
    pub opponents_record: (u32, u32, u32),
}

/// Per-season SOS for every team in the game set. Teams with fewer than
/// `SOS_MIN_GAMES` in a season are skipped for that season.
pub fn season_sos(games: &[Game]) -> Vec<SosEntry> {
    // Season win-loss records, needed before any schedule can be judged
    let mut records: HashMap<(&str, i32), SeasonRecord> = HashMap::new();
    for g in games {
        for side in [Side::Home, Side::Away] {
            let team = match side {
                Side::Home => g.home_team.as_str(),
                Side::Away => g.away_team.as_str(),
            };
            let (us, them) = g.scores_for(side);
            let rec = records.entry((team, g.season)).or_default();
            match us.cmp(&them) {
                std::cmp::Ordering::Greater => rec.wins += 1,
                std::cmp::Ordering::Less => rec.losses += 1,
                std::cmp::Ordering::Equal => rec.ties += 1,
            }
        }
    }

    // team-season → (weighted win pct sum, weight sum, opponent W-L-T tallies)
    let mut schedules: HashMap<(&str, i32), (f64, f64, (u32, u32, u32), usize)> = HashMap::new();
    for g in games {
        for side in [Side::Home, Side::Away] {
            let team = match side {
                Side::Home => g.home_team.as_str(),
                Side::Away => g.away_team.as_str(),
            };
            let opponent = g.opponent_of(side);
            let weight = division_weight(g.classification_of(side.flip()));
            let opp_rec = records
                .get(&(opponent, g.season))
                .cloned()
                .unwrap_or_default();
            let entry = schedules.entry((team, g.season)).or_default();
            entry.0 += opp_rec.win_pct() * weight;
            entry.1 += weight;
            entry.2 .0 += opp_rec.wins;
            entry.2 .1 += opp_rec.losses;
            entry.2 .2 += opp_rec.ties;
            entry.3 += 1;
        }
    }

    let mut out: Vec<SosEntry> = schedules
        .into_iter()
        .filter(|(_, (_, _, _, n))| *n >= SOS_MIN_GAMES)
        .map(|((team, season), (sum, weight, opp, n))| SosEntry {
            team: team.to_string(),
            season,
            sos: if weight > 0.0 { sum / weight * 100.0 } else { 0.0 },
            games: n,
            opponents_record: opp,
        })
        .collect();
    out.sort_by(|a, b| {
        b.sos
            .total_cmp(&a.sos)
            .then_with(|| a.team.cmp(&b.team))
            .then_with(|| a.season.cmp(&b.season))
    });
    out
}

/// SOS for one team across the filtered range, one entry per season played.
pub fn team_sos(games: &[Game], team: &str) -> Vec<SosEntry> {
    let mut entries: Vec<SosEntry> = season_sos(games)
        .into_iter()
        .filter(|e| e.team == team)
        .collect();
    entries.sort_by_key(|e| e.season);
    entries
}

/// The hardest-schedule leaderboard: qualifying season lines sorted by SOS.
pub fn sos_leaderboard(games: &[Game], limit: usize) -> Vec<SosEntry> {
    season_sos(games)
        .into_iter()
        .filter(|e| e.games >= SOS_LEADERBOARD_MIN_GAMES)
        .take(limit)
        .collect()
}
