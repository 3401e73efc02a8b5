//! Plain-text report rendering for the CLI.
//!
//! Every renderer returns a String so the formatting is testable; main just
//! prints the result.

use std::fmt::Write;

use crate::graph::{GraphStats, ScheduleGraph, SeriesSummary};
use crate::scoring::leaderboard::LeaderboardEntry;
use crate::scoring::{TeamRecord, TeamStanding};
use crate::sos::SosEntry;
use crate::standard::{ConferenceLine, SeriesLine, Showdown, VETERAN_SERIES_MIN_GAMES};
use crate::tiers::tier_label;

pub const LEADERBOARD_LIMIT: usize = 50;
const SHOWDOWN_MATCHUP_LIMIT: usize = 25;
const RIVALRY_LIMIT: usize = 10;

pub fn render_leaderboard(entries: &[LeaderboardEntry], limit: usize) -> String {
    let mut out = String::new();
    if entries.is_empty() {
        out.push_str("No teams qualified.\n");
        return out;
    }

    // Best line per tier, strongest tier first
    writeln!(out, "Tier leaders").unwrap();
    let mut seen_tiers = [false; 9];
    for e in entries {
        let slot = e.tier as usize;
        if !seen_tiers[slot] {
            seen_tiers[slot] = true;
            writeln!(
                out,
                "  {:<10} {:<25} {:>8.2}  ({}-{}-{})",
                tier_label(e.tier),
                e.team,
                e.sor,
                e.wins,
                e.losses,
                e.ties
            )
            .unwrap();
        }
    }
    out.push('\n');

    writeln!(
        out,
        "{:>4}  {:<25} {:<10} {:>8} {:>6} {:>9} {:>7}",
        "Rank", "Team", "Tier", "SOR", "Games", "W-L-T", "Pct"
    )
    .unwrap();
    for e in entries.iter().take(limit) {
        writeln!(
            out,
            "{:>4}  {:<25} {:<10} {:>8.2} {:>6} {:>9} {:>7.3}",
            e.rank,
            e.team,
            tier_label(e.tier),
            e.sor,
            e.games,
            format!("{}-{}-{}", e.wins, e.losses, e.ties),
            e.win_pct
        )
        .unwrap();
    }
    out
}

pub fn render_standing(standing: &TeamStanding, team: &str) -> String {
    match standing {
        TeamStanding::Qualified(record) => render_breakdown(record),
        TeamStanding::NotQualified { record, needed } => {
            let mut out = render_breakdown(record);
            writeln!(
                out,
                "\n{} has {} qualifying games, below the {}-game minimum; not ranked.",
                record.team,
                record.game_count(),
                needed
            )
            .unwrap();
            out
        }
        TeamStanding::NoGames => format!("No games found for {team} in the selected range.\n"),
    }
}

/// Per-game breakdown with the modifiers that produced each grade.
fn render_breakdown(record: &TeamRecord) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{}  [{}]  {}-{}-{}  diff {:+}  SOR {:.2}",
        record.team,
        tier_label(record.tier),
        record.wins,
        record.losses,
        record.ties,
        record.point_diff,
        record.sor()
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "{:<6} {:>4} {:<25} {:>7} {:>8}  {}",
        "Season", "Wk", "Opponent", "Score", "Value", "Modifiers"
    )
    .unwrap();
    for g in &record.games {
        let mut mods = format!(
            "Str:{:.2} Tier:{}({:.2}x)",
            g.opponent_strength,
            tier_label(g.opponent_tier),
            g.grade.tier_mult
        );
        if g.grade.location_mult != 1.0 {
            write!(mods, " Road:{:.1}x", g.grade.location_mult).unwrap();
        }
        if g.grade.defense_bonus > 0.0 {
            write!(mods, " Def:+{:.1}", g.grade.defense_bonus).unwrap();
        }
        writeln!(
            out,
            "{:<6} {:>4} {:<25} {:>7} {:>8.2}  {}",
            g.season,
            g.week,
            g.opponent,
            format!("{} {}-{}", g.grade.outcome.letter(), g.points_for, g.points_against),
            g.grade.value,
            mods
        )
        .unwrap();
    }
    out
}

pub fn render_sos(entries: &[SosEntry], header: &str) -> String {
    let mut out = String::new();
    writeln!(out, "{header}").unwrap();
    if entries.is_empty() {
        out.push_str("  (no qualifying seasons)\n");
        return out;
    }
    writeln!(
        out,
        "{:>4}  {:<25} {:>6} {:>7} {:>6}  {}",
        "#", "Team", "Season", "SOS", "Games", "Opp W-L-T"
    )
    .unwrap();
    for (i, e) in entries.iter().enumerate() {
        let (w, l, t) = e.opponents_record;
        writeln!(
            out,
            "{:>4}  {:<25} {:>6} {:>7.2} {:>6}  {}-{}-{}",
            i + 1,
            e.team,
            e.season,
            e.sos,
            e.games,
            w,
            l,
            t
        )
        .unwrap();
    }
    out
}

/// Connection chain with the head-to-head series along each hop.
pub fn render_chain(graph: &ScheduleGraph, path: &[String]) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} -> {}  ({} {})",
        path.first().map(String::as_str).unwrap_or(""),
        path.last().map(String::as_str).unwrap_or(""),
        path.len() - 1,
        if path.len() == 2 { "hop" } else { "hops" }
    )
    .unwrap();
    for pair in path.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        match graph.series(a, b) {
            Some(s) => writeln!(out, "  {} vs {}  {}", a, b, describe_series(a, b, &s)).unwrap(),
            None => writeln!(out, "  {} vs {}", a, b).unwrap(),
        }
    }
    out
}

fn describe_series(a: &str, b: &str, s: &SeriesSummary) -> String {
    let leader = if s.a_wins > s.b_wins {
        format!("{} leads {}-{}-{}", a, s.a_wins, s.b_wins, s.ties)
    } else if s.b_wins > s.a_wins {
        format!("{} leads {}-{}-{}", b, s.b_wins, s.a_wins, s.ties)
    } else {
        format!("series tied {}-{}-{}", s.a_wins, s.b_wins, s.ties)
    };
    format!("({leader}, last met {}: {})", s.last_met, s.last_result)
}

pub fn render_eccentricity(team: &str, distance: usize, furthest: &[String]) -> String {
    let mut out = String::new();
    writeln!(out, "{team}: eccentricity {distance}").unwrap();
    writeln!(out, "Furthest ({}):", furthest.len()).unwrap();
    for t in furthest.iter().take(20) {
        writeln!(out, "  {t}").unwrap();
    }
    if furthest.len() > 20 {
        writeln!(out, "  ... and {} more", furthest.len() - 20).unwrap();
    }
    out
}

pub fn render_unplayed(team: &str, never: &[String]) -> String {
    let mut out = String::new();
    writeln!(out, "{team} has never played {} teams:", never.len()).unwrap();
    for t in never {
        writeln!(out, "  {t}").unwrap();
    }
    out
}

pub fn render_conference_report(name: &str, lines: &[ConferenceLine]) -> String {
    let mut out = String::new();
    writeln!(out, "Conference report: {name}").unwrap();
    if lines.is_empty() {
        out.push_str("  (no member games in the selected range)\n");
        return out;
    }
    writeln!(
        out,
        "{:<25} {:>11} {:>7}",
        "Team", "W-L-T", "Pct"
    )
    .unwrap();
    for l in lines {
        writeln!(
            out,
            "{:<25} {:>11} {:>6.1}%",
            l.team,
            format!("{}-{}-{}", l.wins, l.losses, l.ties),
            l.win_pct() * 100.0
        )
        .unwrap();
    }
    out
}

pub fn render_showdown(c1: &str, c2: &str, s: &Showdown) -> String {
    let mut out = String::new();
    writeln!(out, "Conference showdown: {c1} vs {c2}").unwrap();
    if s.games() == 0 {
        out.push_str("  (the two conferences have never met in the selected range)\n");
        return out;
    }
    writeln!(
        out,
        "Record: {}-{}-{} ({:.1}%)",
        s.wins,
        s.losses,
        s.ties,
        s.win_pct() * 100.0
    )
    .unwrap();
    writeln!(out).unwrap();
    for m in s.matchups.iter().take(SHOWDOWN_MATCHUP_LIMIT) {
        writeln!(
            out,
            "{:<35} {:>11}  last {}",
            format!("{} vs {}", m.a, m.b),
            format!("{}-{}-{}", m.a_wins, m.b_wins, m.ties),
            m.last_met
        )
        .unwrap();
    }
    if s.matchups.len() > SHOWDOWN_MATCHUP_LIMIT {
        writeln!(
            out,
            "... and {} more matchups",
            s.matchups.len() - SHOWDOWN_MATCHUP_LIMIT
        )
        .unwrap();
    }
    out
}

/// League-wide rivalry tables: most played, most one-sided (veteran series
/// only), largest cumulative point gaps.
pub fn render_rivalries(lines: &[SeriesLine]) -> String {
    let mut out = String::new();
    let leader_of = |s: &SeriesLine| s.leader().unwrap_or("Tied").to_string();

    let mut by_count: Vec<&SeriesLine> = lines.iter().collect();
    by_count.sort_by(|x, y| y.games().cmp(&x.games()).then_with(|| x.a.cmp(&y.a)));
    writeln!(out, "Most played rivalries").unwrap();
    writeln!(out, "{:<40} {:>6} {:>11}  Leader", "Matchup", "Games", "Record").unwrap();
    for s in by_count.iter().take(RIVALRY_LIMIT) {
        writeln!(
            out,
            "{:<40} {:>6} {:>11}  {}",
            format!("{} vs {}", s.a, s.b),
            s.games(),
            format!("{}-{}-{}", s.a_wins, s.b_wins, s.ties),
            leader_of(s)
        )
        .unwrap();
    }

    let mut veterans: Vec<&SeriesLine> = lines
        .iter()
        .filter(|s| s.games() >= VETERAN_SERIES_MIN_GAMES)
        .collect();
    veterans.sort_by(|x, y| {
        y.dominance()
            .total_cmp(&x.dominance())
            .then_with(|| x.a.cmp(&y.a))
    });
    writeln!(out, "\nMost one-sided series (min {VETERAN_SERIES_MIN_GAMES} games)").unwrap();
    writeln!(out, "{:<40} {:>6}  Leader", "Matchup", "Win%").unwrap();
    for s in veterans.iter().take(RIVALRY_LIMIT) {
        writeln!(
            out,
            "{:<40} {:>5.1}%  {}",
            format!("{} vs {}", s.a, s.b),
            s.dominance() * 100.0,
            leader_of(s)
        )
        .unwrap();
    }

    let mut by_gap: Vec<&SeriesLine> = lines.iter().collect();
    by_gap.sort_by(|x, y| {
        y.point_diff_a
            .abs()
            .cmp(&x.point_diff_a.abs())
            .then_with(|| x.a.cmp(&y.a))
    });
    writeln!(out, "\nLargest cumulative point differentials").unwrap();
    writeln!(out, "{:<40} {:>6}  Leader", "Matchup", "Diff").unwrap();
    for s in by_gap.iter().take(RIVALRY_LIMIT) {
        writeln!(
            out,
            "{:<40} {:>+6}  {}",
            format!("{} vs {}", s.a, s.b),
            s.point_diff_a.abs(),
            leader_of(s)
        )
        .unwrap();
    }
    out
}

pub fn render_graph_stats(stats: &GraphStats) -> String {
    let mut out = String::new();
    writeln!(out, "Teams:             {}", stats.teams).unwrap();
    writeln!(out, "Matchups:          {}", stats.matchups).unwrap();
    writeln!(out, "Components:        {}", stats.components).unwrap();
    writeln!(out, "Largest component: {}", stats.largest_component).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::grader::grade_game;
    use crate::scoring::GradedGame;

    fn record() -> TeamRecord {
        let grade = grade_game(31, 10, false, 2, 1.0, Some(20.0));
        TeamRecord {
            team: "Boise State".into(),
            tier: 2,
            wins: 1,
            losses: 0,
            ties: 0,
            point_diff: 21,
            games: vec![GradedGame {
                opponent: "Oregon".into(),
                season: 2024,
                week: 2,
                points_for: 31,
                points_against: 10,
                opponent_strength: 0.72,
                opponent_tier: 1,
                grade,
            }],
        }
    }

    #[test]
    fn breakdown_shows_modifiers() {
        let out = render_breakdown(&record());
        assert!(out.contains("Boise State"));
        assert!(out.contains("W 31-10"));
        assert!(out.contains("Str:0.72"));
        assert!(out.contains("Tier:P4"));
        assert!(out.contains("Road:1.1x"));
    }

    #[test]
    fn not_qualified_line_names_the_minimum() {
        let standing = TeamStanding::NotQualified {
            record: record(),
            needed: 10,
        };
        let out = render_standing(&standing, "Boise State");
        assert!(out.contains("below the 10-game minimum"));
    }

    #[test]
    fn empty_leaderboard_has_a_message() {
        assert!(render_leaderboard(&[], 50).contains("No teams qualified."));
    }

    #[test]
    fn rivalry_tables_name_the_leader() {
        let series = SeriesLine {
            a: "Army".into(),
            b: "Navy".into(),
            a_wins: 15,
            b_wins: 5,
            ties: 2,
            point_diff_a: 180,
            last_met: 2024,
        };
        let out = render_rivalries(&[series]);
        assert!(out.contains("Most played rivalries"));
        assert!(out.contains("Army vs Navy"));
        assert!(out.contains("15-5-2"));
        // 22 games clears the veteran threshold; Army leads 75% of decisive
        assert!(out.contains("75.0%"));
        assert!(out.contains("+180"));
    }

    #[test]
    fn empty_showdown_has_a_message() {
        let s = Showdown {
            wins: 0,
            losses: 0,
            ties: 0,
            matchups: vec![],
        };
        assert!(render_showdown("SEC", "Big Ten", &s).contains("never met"));
    }
}
