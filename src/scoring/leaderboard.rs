//! Final ranking assembly.
//!
//! Qualification (the minimum-games rule) applies only here: every team is
//! scored during refinement so its strength can feed its opponents' grades,
//! but thin records don't earn a leaderboard slot.

use serde::Serialize;

use super::refine::TeamRecord;

pub const DEFAULT_MIN_GAMES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub team: String,
    pub tier: u8,
    pub sor: f64,
    pub games: usize,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub point_diff: i64,
    pub win_pct: f64,
}

/// Outcome of a single-team query. "Not qualified" and "no data" are
/// distinct, representable results, never errors.
#[derive(Debug, Serialize)]
pub enum TeamStanding {
    Qualified(TeamRecord),
    NotQualified { record: TeamRecord, needed: usize },
    NoGames,
}

/// Build the sorted, tie-broken leaderboard from final-pass records.
///
/// Sort order: SOR descending; ties by qualifying-game count descending,
/// then win percentage descending, then team name ascending so equal lines
/// always print in the same order.
pub fn build_leaderboard(records: &[TeamRecord], min_games: usize) -> Vec<LeaderboardEntry> {
    let mut qualified: Vec<&TeamRecord> = records
        .iter()
        .filter(|r| r.game_count() >= min_games)
        .collect();

    qualified.sort_by(|a, b| {
        b.sor()
            .total_cmp(&a.sor())
            .then_with(|| b.game_count().cmp(&a.game_count()))
            .then_with(|| b.win_pct().total_cmp(&a.win_pct()))
            .then_with(|| a.team.cmp(&b.team))
    });

    qualified
        .into_iter()
        .enumerate()
        .map(|(i, r)| LeaderboardEntry {
            rank: i + 1,
            team: r.team.clone(),
            tier: r.tier,
            sor: r.sor(),
            games: r.game_count(),
            wins: r.wins,
            losses: r.losses,
            ties: r.ties,
            point_diff: r.point_diff,
            win_pct: r.win_pct(),
        })
        .collect()
}

/// Resolve one team's standing against the qualification threshold.
pub fn team_standing(
    records: &[TeamRecord],
    team: &str,
    min_games: usize,
) -> TeamStanding {
    match records.iter().find(|r| r.team == team) {
        None => TeamStanding::NoGames,
        Some(r) if r.game_count() >= min_games => TeamStanding::Qualified(r.clone()),
        Some(r) => TeamStanding::NotQualified {
            record: r.clone(),
            needed: min_games,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::grader::{grade_game, GameGrade};
    use crate::scoring::refine::GradedGame;
    use approx::assert_relative_eq;

    fn graded(value_seed: i32) -> GradedGame {
        let grade: GameGrade = grade_game(21 + value_seed, 14, true, 1, 1.0, None);
        GradedGame {
            opponent: "Opp".into(),
            season: 2024,
            week: 1,
            points_for: 21 + value_seed,
            points_against: 14,
            opponent_strength: 1.0,
            opponent_tier: 1,
            grade,
        }
    }

    fn record(team: &str, tier: u8, wins: u32, games: usize) -> TeamRecord {
        TeamRecord {
            team: team.into(),
            tier,
            wins,
            losses: (games as u32).saturating_sub(wins),
            ties: 0,
            point_diff: 0,
            games: (0..games).map(|i| graded(i as i32 % 3)).collect(),
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let records = vec![record("Nine", 1, 9, 9), record("Ten", 1, 10, 10)];
        let board = build_leaderboard(&records, DEFAULT_MIN_GAMES);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].team, "Ten");

        // Lowering the threshold admits the nine-game team
        let board = build_leaderboard(&records, 9);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn sor_includes_tier_penalty_once() {
        let r = record("A", 2, 10, 10);
        let mean = r.games.iter().map(|g| g.grade.value).sum::<f64>() / 10.0;
        assert_relative_eq!(r.sor(), mean - 15.0, epsilon = 1e-12);
    }

    #[test]
    fn ranks_are_dense_and_sorted() {
        let records = vec![
            record("Weak", 8, 2, 11),
            record("Strong", 1, 11, 11),
            record("Mid", 4, 6, 11),
        ];
        let board = build_leaderboard(&records, 10);
        assert_eq!(board.len(), 3);
        assert_eq!(
            board.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for w in board.windows(2) {
            assert!(w[0].sor >= w[1].sor);
        }
        assert_eq!(board[0].team, "Strong");
    }

    #[test]
    fn ties_break_by_games_then_pct_then_name() {
        // Same grades per game → same mean; same tier → same SOR.
        let mut a = record("Delta", 1, 10, 10);
        let mut b = record("Alpha", 1, 10, 10);
        a.games = (0..10).map(|_| graded(0)).collect();
        b.games = (0..10).map(|_| graded(0)).collect();

        let board = build_leaderboard(&[a.clone(), b.clone()], 10);
        assert_eq!(board[0].team, "Alpha");
        assert_eq!(board[1].team, "Delta");

        // More games wins the tie outright
        let mut c = record("Zulu", 1, 12, 12);
        c.games = (0..12).map(|_| graded(0)).collect();
        let board = build_leaderboard(&[a, b, c], 10);
        assert_eq!(board[0].team, "Zulu");
    }

    #[test]
    fn entries_and_standings_serialize_to_json() {
        let board = build_leaderboard(&[record("Alpha", 1, 10, 10)], 10);
        let v = serde_json::to_value(&board).unwrap();
        assert_eq!(v[0]["rank"], 1);
        assert_eq!(v[0]["team"], "Alpha");
        assert_eq!(v[0]["games"], 10);

        // The full standing carries the per-game grades, outcome included
        let records = vec![record("Six", 1, 3, 6)];
        let standing = team_standing(&records, "Six", DEFAULT_MIN_GAMES);
        let v = serde_json::to_value(&standing).unwrap();
        assert_eq!(v["NotQualified"]["needed"], DEFAULT_MIN_GAMES);
        assert_eq!(
            v["NotQualified"]["record"]["games"][0]["grade"]["outcome"],
            "Win"
        );
    }

    #[test]
    fn standing_distinguishes_thin_from_absent() {
        let records = vec![record("Six", 1, 3, 6)];
        match team_standing(&records, "Six", DEFAULT_MIN_GAMES) {
            TeamStanding::NotQualified { record, needed } => {
                assert_eq!(record.game_count(), 6);
                assert_eq!(needed, DEFAULT_MIN_GAMES);
            }
            other => panic!("expected NotQualified, got {other:?}"),
        }
        assert!(matches!(
            team_standing(&records, "Ghost", DEFAULT_MIN_GAMES),
            TeamStanding::NoGames
        ));
        assert!(matches!(
            team_standing(&records, "Six", 6),
            TeamStanding::Qualified(_)
        ));
    }
}
