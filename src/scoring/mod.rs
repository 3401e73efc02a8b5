//! The SOR scoring engine: filter → grade → refine → aggregate.

pub mod defense;
pub mod filter;
pub mod grader;
pub mod leaderboard;
pub mod refine;

use crate::db::models::Game;
use crate::error::Result;
use crate::tiers::TierTable;

pub use filter::GameFilter;
pub use leaderboard::{build_leaderboard, team_standing, TeamStanding, DEFAULT_MIN_GAMES};
pub use refine::{GradedGame, TeamRecord};

/// Run the whole synchronous pipeline over the cached games: validate the
/// filter, select qualifying games, resolve tiers and defensive averages,
/// then run the fixed refinement passes. Returns one record per team that
/// appears in the filtered set.
pub fn score(games: &[Game], filter: &GameFilter) -> Result<Vec<TeamRecord>> {
    filter.validate()?;
    let filtered = filter.apply(games);
    let tiers = TierTable::build(&filtered);
    let defense = defense::DefenseAverages::build(&filtered);
    refine::RefinementEngine::new(&filtered, &tiers, &defense).run()
}
