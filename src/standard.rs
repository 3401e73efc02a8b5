//! Plain win-percentage analytics, no grading involved.
//!
//! Conference reports (member win-pct leaderboard), two-conference showdowns
//! (aggregate head-to-head record plus per-matchup lines), and league-wide
//! rivalry tables (most played, most one-sided, largest cumulative point
//! gaps). All straight tallies over the filtered game set.

use std::collections::{HashMap, HashSet};

use crate::db::models::{Game, Side};

/// Series with fewer games than this don't qualify for the one-sided table.
pub const VETERAN_SERIES_MIN_GAMES: u32 = 20;

/// One team's overall record within a conference report.
#[derive(Debug, Clone)]
pub struct ConferenceLine {
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl ConferenceLine {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn win_pct(&self) -> f64 {
        let n = self.games();
        if n == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.ties as f64 * 0.5) / n as f64
    }
}

/// All-time record of one unordered team pair, from `a`'s perspective with
/// `a < b` lexicographically so every pair appears exactly once.
#[derive(Debug, Clone)]
pub struct SeriesLine {
    pub a: String,
    pub b: String,
    pub a_wins: u32,
    pub b_wins: u32,
    pub ties: u32,
    /// Cumulative scoring margin from `a`'s perspective.
    pub point_diff_a: i64,
    pub last_met: i32,
}

impl SeriesLine {
    pub fn games(&self) -> u32 {
        self.a_wins + self.b_wins + self.ties
    }

    pub fn leader(&self) -> Option<&str> {
        match self.a_wins.cmp(&self.b_wins) {
            std::cmp::Ordering::Greater => Some(&self.a),
            std::cmp::Ordering::Less => Some(&self.b),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Leader's share of decisive games; 0 when every meeting tied.
    pub fn dominance(&self) -> f64 {
        let decisive = self.a_wins + self.b_wins;
        if decisive == 0 {
            return 0.0;
        }
        self.a_wins.max(self.b_wins) as f64 / decisive as f64
    }
}

/// Two-conference head-to-head, from the first conference's perspective.
#[derive(Debug, Clone)]
pub struct Showdown {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// One line per team pair that has actually met, newest meeting first.
    pub matchups: Vec<SeriesLine>,
}

impl Showdown {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn win_pct(&self) -> f64 {
        let n = self.games();
        if n == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.ties as f64 * 0.5) / n as f64
    }
}

/// Win-pct leaderboard for a conference's historical members, counting every
/// game those teams played in the filtered set.
pub fn conference_report(games: &[Game], members: &HashSet<String>) -> Vec<ConferenceLine> {
    let mut by_team: HashMap<&str, ConferenceLine> = HashMap::new();
    for g in games {
        for side in [Side::Home, Side::Away] {
            let team = match side {
                Side::Home => g.home_team.as_str(),
                Side::Away => g.away_team.as_str(),
            };
            if !members.contains(team) {
                continue;
            }
            let line = by_team.entry(team).or_insert_with(|| ConferenceLine {
                team: team.to_string(),
                wins: 0,
                losses: 0,
                ties: 0,
            });
            let (us, them) = g.scores_for(side);
            match us.cmp(&them) {
                std::cmp::Ordering::Greater => line.wins += 1,
                std::cmp::Ordering::Less => line.losses += 1,
                std::cmp::Ordering::Equal => line.ties += 1,
            }
        }
    }
    let mut lines: Vec<ConferenceLine> = by_team.into_values().collect();
    lines.sort_by(|x, y| {
        y.win_pct()
            .total_cmp(&x.win_pct())
            .then_with(|| y.games().cmp(&x.games()))
            .then_with(|| x.team.cmp(&y.team))
    });
    lines
}

/// Every team pair's all-time series within the filtered set.
pub fn series_lines(games: &[Game]) -> Vec<SeriesLine> {
    let mut pairs: HashMap<(&str, &str), SeriesLine> = HashMap::new();
    for g in games {
        let (a, b) = if g.home_team <= g.away_team {
            (g.home_team.as_str(), g.away_team.as_str())
        } else {
            (g.away_team.as_str(), g.home_team.as_str())
        };
        let line = pairs.entry((a, b)).or_insert_with(|| SeriesLine {
            a: a.to_string(),
            b: b.to_string(),
            a_wins: 0,
            b_wins: 0,
            ties: 0,
            point_diff_a: 0,
            last_met: g.season,
        });
        let a_side = if g.home_team.as_str() == a {
            Side::Home
        } else {
            Side::Away
        };
        let (us, them) = g.scores_for(a_side);
        match us.cmp(&them) {
            std::cmp::Ordering::Greater => line.a_wins += 1,
            std::cmp::Ordering::Less => line.b_wins += 1,
            std::cmp::Ordering::Equal => line.ties += 1,
        }
        line.point_diff_a += (us - them) as i64;
        line.last_met = line.last_met.max(g.season);
    }
    pairs.into_values().collect()
}

/// Head-to-head record between two conferences' member sets.
///
/// Teams belonging to both lineages (realignment overlap) are skipped; their
/// games have no meaningful side in the showdown.
pub fn conference_showdown(
    games: &[Game],
    c1_members: &HashSet<String>,
    c2_members: &HashSet<String>,
) -> Showdown {
    let only_c1 = |t: &str| c1_members.contains(t) && !c2_members.contains(t);
    let only_c2 = |t: &str| c2_members.contains(t) && !c1_members.contains(t);

    let mut showdown = Showdown {
        wins: 0,
        losses: 0,
        ties: 0,
        matchups: Vec::new(),
    };

    let cross: Vec<Game> = games
        .iter()
        .filter(|g| {
            (only_c1(&g.home_team) && only_c2(&g.away_team))
                || (only_c2(&g.home_team) && only_c1(&g.away_team))
        })
        .cloned()
        .collect();

    for g in &cross {
        let c1_side = if only_c1(&g.home_team) {
            Side::Home
        } else {
            Side::Away
        };
        let (us, them) = g.scores_for(c1_side);
        match us.cmp(&them) {
            std::cmp::Ordering::Greater => showdown.wins += 1,
            std::cmp::Ordering::Less => showdown.losses += 1,
            std::cmp::Ordering::Equal => showdown.ties += 1,
        }
    }

    // Per-matchup lines oriented with the first conference's team as `a`
    let mut matchups: Vec<SeriesLine> = series_lines(&cross)
        .into_iter()
        .map(|line| {
            if only_c1(&line.a) {
                line
            } else {
                SeriesLine {
                    a: line.b,
                    b: line.a,
                    a_wins: line.b_wins,
                    b_wins: line.a_wins,
                    ties: line.ties,
                    point_diff_a: -line.point_diff_a,
                    last_met: line.last_met,
                }
            }
        })
        .collect();
    matchups.sort_by(|x, y| {
        y.last_met
            .cmp(&x.last_met)
            .then_with(|| x.a.cmp(&y.a))
            .then_with(|| x.b.cmp(&y.b))
    });
    showdown.matchups = matchups;
    showdown
}
