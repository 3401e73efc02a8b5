//! Per-game grading.
//!
//! Every game is graded twice, once from each participant's perspective. The
//! defining property of the model is the asymmetric tier-disparity
//! multiplier: beating down the divisions is worth little (Bully Penalty),
//! beating up is worth a lot (Upset Bonus), and losing down is punished hard
//! (Bad Loss Penalty) while losing up costs nothing beyond the zero base.
//!
//! The tier gap is continuous: pass 0 feeds static tier weights through
//! [`crate::tiers::effective_tier`], later passes feed computed opponent
//! strength through the same scale, so one multiplier function serves every
//! refinement pass.

use serde::Serialize;

/// Margin-of-victory bonus cap. Running up the score past four touchdowns
/// buys nothing.
pub const MOV_CAP: f64 = 28.0;

/// Grade points per point the opponent was held under its season average.
pub const DEF_BONUS_PER_POINT: f64 = 0.5;
pub const DEF_BONUS_CAP: f64 = 15.0;

/// Road wins are worth 10% extra.
pub const ROAD_WIN_MULT: f64 = 1.1;

/// Bully Penalty: win over a lower tier dampens linearly, floored at ×0.1.
pub const BULLY_SLOPE: f64 = 0.12;
pub const BULLY_FLOOR: f64 = 0.1;

/// Upset Bonus: win over a higher tier amplifies linearly, capped at ×2.0.
pub const UPSET_SLOPE: f64 = 0.3;
pub const UPSET_CEIL: f64 = 2.0;

/// Bad Loss Penalty: loss to a lower tier amplifies the penalty, capped at
/// ×1.7 (reached exactly at the maximum gap of 7).
pub const BAD_LOSS_SLOPE: f64 = 0.1;
pub const BAD_LOSS_CEIL: f64 = 1.7;

/// Flat magnitude of a loss before the margin-of-defeat component.
pub const LOSS_BASE_MAGNITUDE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn from_margin(margin: i32) -> Self {
        match margin.signum() {
            1 => Outcome::Win,
            -1 => Outcome::Loss,
            _ => Outcome::Tie,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
            Outcome::Tie => 'T',
        }
    }
}

/// One graded game from one team's perspective. Ephemeral: rebuilt from
/// scratch on every refinement pass.
#[derive(Debug, Clone, Serialize)]
pub struct GameGrade {
    pub outcome: Outcome,
    /// Win 100 / tie 50 / loss 0, before any bonus.
    pub base: f64,
    pub mov_bonus: f64,
    pub defense_bonus: f64,
    pub location_mult: f64,
    pub tier_mult: f64,
    /// Final grade, roughly within [−150, +200].
    pub value: f64,
}

/// Tier-disparity multiplier for a game outcome.
///
/// `gap` is opponent tier minus own tier on the continuous effective-tier
/// scale: positive means the opponent is weaker. Gap 0 is always ×1.0.
pub fn tier_multiplier(outcome: Outcome, my_tier: f64, opp_tier: f64) -> f64 {
    let gap = opp_tier - my_tier;
    match outcome {
        Outcome::Win if gap > 0.0 => (1.0 - gap * BULLY_SLOPE).max(BULLY_FLOOR),
        Outcome::Win if gap < 0.0 => (1.0 + gap.abs() * UPSET_SLOPE).min(UPSET_CEIL),
        Outcome::Loss if gap > 0.0 => (1.0 + gap * BAD_LOSS_SLOPE).min(BAD_LOSS_CEIL),
        _ => 1.0,
    }
}

/// Grade a single game from one perspective.
///
/// * `points_for` / `points_against`: final score from the perspective side.
/// * `is_home`: whether the perspective team hosted.
/// * `my_tier`: the perspective team's tier for this game's season.
/// * `opp_effective_tier`: the opponent's strength on the effective-tier
///   scale for the current pass.
/// * `opp_season_avg_allowed`: the opponent's season average points allowed,
///   when known; holding the opponent under it earns a defensive bonus.
pub fn grade_game(
    points_for: i32,
    points_against: i32,
    is_home: bool,
    my_tier: u8,
    opp_effective_tier: f64,
    opp_season_avg_allowed: Option<f64>,
) -> GameGrade {
    let margin = points_for - points_against;
    let outcome = Outcome::from_margin(margin);

    let base = match outcome {
        Outcome::Win => 100.0,
        Outcome::Tie => 50.0,
        Outcome::Loss => 0.0,
    };

    let mov_bonus = match outcome {
        Outcome::Win => (margin as f64).min(MOV_CAP),
        _ => 0.0,
    };

    // Held the opponent under its own season average → credit the defense.
    let defense_bonus = match (outcome, opp_season_avg_allowed) {
        (Outcome::Loss, _) | (_, None) => 0.0,
        (_, Some(avg)) => {
            let shortfall = avg - points_against as f64;
            (shortfall.max(0.0) * DEF_BONUS_PER_POINT).min(DEF_BONUS_CAP)
        }
    };

    let location_mult = if outcome == Outcome::Win && !is_home {
        ROAD_WIN_MULT
    } else {
        1.0
    };

    let tier_mult = tier_multiplier(outcome, my_tier as f64, opp_effective_tier);

    let value = match outcome {
        Outcome::Win | Outcome::Tie => {
            (base + mov_bonus + defense_bonus) * location_mult * tier_mult
        }
        // Losses contribute a negative grade scaled by margin of defeat; the
        // Bad Loss multiplier amplifies it, losses upward stay at ×1.0.
        Outcome::Loss => {
            -(LOSS_BASE_MAGNITUDE + ((-margin) as f64).min(MOV_CAP)) * tier_mult
        }
    };

    GameGrade {
        outcome,
        base,
        mov_bonus,
        defense_bonus,
        location_mult,
        tier_mult,
        value,
    }
}
