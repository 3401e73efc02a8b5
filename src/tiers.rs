//! Eight-tier strength classification.
//!
//! Every team-season resolves to one ordinal tier in 1..=8, derived from its
//! conference membership for that season. Tier 1 (P4) is the strongest; tier
//! 8 (D3 standard / NAIA) the weakest. Each tier carries a static starting
//! weight (pass-0 opponent strength) and a baseline penalty applied once at
//! aggregation time.

use std::collections::HashMap;

use crate::db::models::{Game, Side};
use crate::error::{GridrankError, Result};

pub const TIER_COUNT: usize = 8;

pub const TIER_LABELS: [&str; TIER_COUNT] = [
    "P4", "G5", "FCS Pwr", "FCS Std", "D2 Pwr", "D2 Std", "D3 Pwr", "D3 Std",
];

/// Starting opponent strength for pass 0, indexed by tier − 1.
pub const TIER_WEIGHTS: [f64; TIER_COUNT] = [1.0, 0.8, 0.6, 0.4, 0.3, 0.2, 0.15, 0.05];

/// Baseline penalty added once to a team's aggregate SOR, indexed by tier − 1.
/// Monotonically decreasing so weak-division records can't crowd out P4 teams.
pub const TIER_PENALTIES: [f64; TIER_COUNT] =
    [0.0, -15.0, -45.0, -65.0, -85.0, -105.0, -125.0, -145.0];

/// Fallback tier per division classification when no conference matches.
const TIER_DEFAULTS: [(&str, u8); 4] = [("fbs", 2), ("fcs", 4), ("ii", 6), ("iii", 8)];
const UNKNOWN_TIER: u8 = 8;

/// Independents that are historically P4-calibre. Keeps 1980s Miami and Notre
/// Dame in tier 1 without dragging UMass/UConn up with them.
const POWER_INDEPENDENTS: [&str; 11] = [
    "Notre Dame",
    "Penn State",
    "Miami",
    "Florida State",
    "Syracuse",
    "Pittsburgh",
    "Boston College",
    "West Virginia",
    "Virginia Tech",
    "South Carolina",
    "BYU",
];

/// Conference name → tier. Includes historical names and common aliases.
const CONF_TIER_MAP: [(&str, u8); 44] = [
    // Tier 1: Power 4 (and power ancestors)
    ("SEC", 1),
    ("Big Ten", 1),
    ("Big 12", 1),
    ("ACC", 1),
    ("Pac-12", 1),
    ("Southeastern Conference", 1),
    ("Big Ten Conference", 1),
    ("Atlantic Coast Conference", 1),
    ("Pac-10", 1),
    ("SWC", 1),
    ("Southwest Conference", 1),
    ("Big Eight", 1),
    ("Big Six", 1),
    ("Big Seven", 1),
    // Tier 2: G5
    ("American Athletic", 2),
    ("Mountain West", 2),
    ("Sun Belt", 2),
    ("MAC", 2),
    ("Mid-American", 2),
    ("Conference USA", 2),
    ("FBS Independents", 2),
    // Tier 3: FCS power
    ("Missouri Valley", 3),
    ("MVFC", 3),
    ("Big Sky", 3),
    ("CAA", 3),
    ("Colonial", 3),
    ("Southern", 3),
    ("SoCon", 3),
    ("Southland", 3),
    ("Ivy", 3),
    // Tier 5: D2 power
    ("GLIAC", 5),
    ("Gulf South", 5),
    ("MIAA", 5),
    ("PSAC", 5),
    ("Lone Star", 5),
    // Tier 7/8: D3 power and the rest
    ("WIAC", 7),
    ("OAC", 7),
    ("American Southwest", 7),
    ("CCIW", 7),
    ("Centennial", 7),
    ("Empire 8", 7),
    ("NACC", 8),
    ("NEWMAC", 8),
    ("NJAC", 8),
];

/// Short names that must never be substring-matched (e.g. "MAC" is inside
/// "MACJC", "ACC" inside "WIAC-adjacent" strings).
const UNSAFE_PARTIAL_KEYS: [&str; 5] = ["ACC", "MAC", "SEC", "CAA", "OAC"];

pub fn tier_label(tier: u8) -> &'static str {
    TIER_LABELS
        .get(tier as usize - 1)
        .copied()
        .unwrap_or("T?")
}

pub fn tier_weight(tier: u8) -> f64 {
    TIER_WEIGHTS[(tier as usize - 1).min(TIER_COUNT - 1)]
}

pub fn tier_penalty(tier: u8) -> f64 {
    TIER_PENALTIES[(tier as usize - 1).min(TIER_COUNT - 1)]
}

/// Map an opponent-strength value on the tier-weight scale back to a
/// continuous "effective tier" by inverting the weight table piecewise.
///
/// Exact tier weights invert exactly (`effective_tier(tier_weight(t)) == t`),
/// so pass-0 grading against static tiers reproduces integral tier gaps, and
/// later passes get fractional gaps from computed strength.
pub fn effective_tier(strength: f64) -> f64 {
    let s = strength.clamp(TIER_WEIGHTS[TIER_COUNT - 1], TIER_WEIGHTS[0]);
    for i in 0..TIER_COUNT - 1 {
        let hi = TIER_WEIGHTS[i];
        let lo = TIER_WEIGHTS[i + 1];
        if s <= hi && s >= lo {
            let frac = if hi > lo { (hi - s) / (hi - lo) } else { 0.0 };
            return (i + 1) as f64 + frac;
        }
    }
    TIER_COUNT as f64
}

/// Resolve a single team-season to a tier from its conference and division.
pub fn classify(team: &str, conference: Option<&str>, classification: Option<&str>) -> u8 {
    // Historical power independents
    if matches!(conference, Some("FBS Independents") | Some("Independent"))
        && POWER_INDEPENDENTS.contains(&team)
    {
        return 1;
    }
    // Notre Dame is T1 in every era
    if team == "Notre Dame" {
        return 1;
    }
    // Pac-2 leftovers play a G5-grade schedule
    if (team == "Oregon State" || team == "Washington State") && classification == Some("fbs") {
        return 2;
    }

    if let Some(conf) = conference {
        for (name, tier) in CONF_TIER_MAP {
            if name == conf {
                return tier;
            }
        }
        // Partial match, guarding short names that collide as substrings
        for (name, tier) in CONF_TIER_MAP {
            if UNSAFE_PARTIAL_KEYS.contains(&name) {
                continue;
            }
            if conf.contains(name) {
                return tier;
            }
        }
    }

    classification
        .and_then(|c| {
            TIER_DEFAULTS
                .iter()
                .find(|(div, _)| c.eq_ignore_ascii_case(div))
                .map(|&(_, t)| t)
        })
        .unwrap_or(UNKNOWN_TIER)
}

/// Precomputed `(team, season) → tier` table for one query.
///
/// Built from the filtered game universe: for each team-season, the majority
/// conference across that season's game rows decides the tier. Tier never
/// changes within a season; it may change between seasons.
pub struct TierTable {
    tiers: HashMap<(String, i32), u8>,
}

impl TierTable {
    pub fn build(games: &[Game]) -> Self {
        // (team, season) → conference vote counts + last seen classification
        let mut votes: HashMap<(String, i32), (HashMap<String, usize>, Option<String>)> =
            HashMap::new();

        for g in games {
            for side in [Side::Home, Side::Away] {
                let team = match side {
                    Side::Home => &g.home_team,
                    Side::Away => &g.away_team,
                };
                let entry = votes
                    .entry((team.clone(), g.season))
                    .or_insert_with(|| (HashMap::new(), None));
                if let Some(conf) = g.conference_of(side) {
                    *entry.0.entry(conf.to_string()).or_insert(0) += 1;
                }
                if let Some(class) = g.classification_of(side) {
                    entry.1 = Some(class.to_string());
                }
            }
        }

        let tiers = votes
            .into_iter()
            .map(|((team, season), (confs, class))| {
                let primary = confs
                    .iter()
                    .max_by_key(|&(name, count)| (*count, std::cmp::Reverse(name.as_str())))
                    .map(|(name, _)| name.clone());
                let tier = classify(&team, primary.as_deref(), class.as_deref());
                ((team, season), tier)
            })
            .collect();

        TierTable { tiers }
    }

    /// Tier for a team-season. Fails loudly rather than defaulting: a wrong
    /// tier silently corrupts the whole leaderboard.
    pub fn tier(&self, team: &str, season: i32) -> Result<u8> {
        self.tiers
            .get(&(team.to_string(), season))
            .copied()
            .ok_or_else(|| GridrankError::MissingTierData {
                team: team.to_string(),
                season,
            })
    }

    /// The team's tier in the latest season it appears in, used for the
    /// aggregate baseline penalty over multi-season ranges.
    pub fn latest_tier(&self, team: &str) -> Option<u8> {
        self.tiers
            .iter()
            .filter(|((t, _), _)| t == team)
            .max_by_key(|((_, season), _)| *season)
            .map(|(_, tier)| *tier)
    }
}
