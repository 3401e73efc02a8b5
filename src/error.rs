use thiserror::Error;

/// Errors surfaced by the scoring pipeline.
///
/// Data-integrity failures (`MissingTierData`) abort a query outright: a
/// silently-defaulted tier would corrupt the rankings league-wide. Query-shape
/// outcomes like an empty filter result or a team below the games threshold
/// are *not* errors; they are represented in the result types.
#[derive(Debug, Error)]
pub enum GridrankError {
    /// A team appears in a filtered game but has no resolvable tier for that
    /// season.
    #[error("no tier data for {team} in {season}")]
    MissingTierData { team: String, season: i32 },

    /// Start season after end season, or an inverted week range. Rejected
    /// before any grading begins.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// User-supplied team name matched nothing in the cache.
    #[error("team '{0}' not found")]
    TeamNotFound(String),

    /// The games cache is empty; `gridrank fetch` has not been run.
    #[error("games cache is empty; run `gridrank fetch` first")]
    EmptyCache,

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub type Result<T, E = GridrankError> = std::result::Result<T, E>;
