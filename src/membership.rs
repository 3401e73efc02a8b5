//! Conference lineage and historical membership.
//!
//! A conference filter like `--conf "Big 12"` has to find the teams that were
//! members *during the queried seasons*, under whichever name the conference
//! carried at the time. Membership truth comes straight from the cached game
//! rows (each row records both sides' conference as of that season); the
//! alias table maps user input and historical names onto one official name
//! per lineage.

use std::collections::HashSet;

use tracing::warn;

use crate::db::models::{Game, Side};

/// Official conference name → accepted aliases and historical ancestors.
/// Matching is case-insensitive on both columns.
const LINEAGE: [(&str, &[&str]); 12] = [
    ("SEC", &["Southeastern", "Southeastern Conference"]),
    ("Big Ten", &["Big Ten Conference", "B1G", "Western Conference"]),
    (
        "Big 12",
        &["Big 12 Conference", "Big Eight", "Big Seven", "Big Six"],
    ),
    ("ACC", &["Atlantic Coast Conference"]),
    ("Pac-12", &["Pac-10", "Pac-8", "Pacific Coast Conference", "AAWU"]),
    ("SWC", &["Southwest Conference", "Southwest"]),
    ("American Athletic", &["AAC", "Big East"]),
    ("Conference USA", &["C-USA", "CUSA"]),
    ("Mid-American", &["MAC"]),
    ("Mountain West", &["MW", "MWC", "WAC"]),
    ("Missouri Valley", &["MVFC", "Gateway"]),
    ("Ivy", &["Ivy League"]),
];

/// Resolve user input to the set of conference names it covers for matching:
/// the official name plus every alias/ancestor in its lineage. Unknown input
/// matches only itself.
pub fn expand_conference(input: &str) -> Vec<String> {
    for (official, aliases) in LINEAGE {
        let hit = official.eq_ignore_ascii_case(input)
            || aliases.iter().any(|a| a.eq_ignore_ascii_case(input));
        if hit {
            let mut names = vec![official.to_string()];
            names.extend(aliases.iter().map(|a| a.to_string()));
            return names;
        }
    }
    vec![input.to_string()]
}

/// Teams that were members of the given conference (lineage-expanded) at any
/// point inside the season range, read off the game rows themselves.
pub fn members_in_range(
    games: &[Game],
    conference: &str,
    start_season: i32,
    end_season: i32,
) -> HashSet<String> {
    let names = expand_conference(conference);
    let matches = |conf: Option<&str>| {
        conf.map(|c| names.iter().any(|n| c.eq_ignore_ascii_case(n) || c.contains(n.as_str())))
            .unwrap_or(false)
    };

    let mut members = HashSet::new();
    for g in games {
        if g.season < start_season || g.season > end_season {
            continue;
        }
        for side in [Side::Home, Side::Away] {
            if matches(g.conference_of(side)) {
                let team = match side {
                    Side::Home => &g.home_team,
                    Side::Away => &g.away_team,
                };
                members.insert(team.clone());
            }
        }
    }
    if members.is_empty() {
        warn!(
            conference,
            start_season, end_season, "no historical members found for conference"
        );
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_case_insensitively() {
        let names = expand_conference("big eight");
        assert!(names.iter().any(|n| n == "Big 12"));
        assert!(names.iter().any(|n| n == "Big Eight"));
    }

    #[test]
    fn unknown_conference_matches_itself() {
        assert_eq!(expand_conference("Lone Star"), vec!["Lone Star".to_string()]);
    }

    fn game(season: i32, home: &str, away: &str, home_conf: &str, away_conf: &str) -> Game {
        Game {
            id: None,
            season,
            week: 1,
            home_team: home.into(),
            away_team: away.into(),
            home_score: 21,
            away_score: 7,
            postseason: false,
            conference_game: false,
            home_conference: Some(home_conf.into()),
            away_conference: Some(away_conf.into()),
            home_classification: Some("fbs".into()),
            away_classification: Some("fbs".into()),
        }
    }

    #[test]
    fn membership_tracks_the_era() {
        let games = vec![
            game(1995, "Nebraska", "Oklahoma", "Big Eight", "Big Eight"),
            game(2005, "Texas", "Oklahoma", "Big 12", "Big 12"),
            game(2015, "Nebraska", "Wisconsin", "Big Ten", "Big Ten"),
        ];
        // Querying the Big 12 lineage over all years picks up the Big Eight era
        let all = members_in_range(&games, "Big 12", 1990, 2020);
        assert!(all.contains("Nebraska"));
        assert!(all.contains("Texas"));
        assert!(!all.contains("Wisconsin"));

        // Restricting the range drops the Big Eight era members
        let modern = members_in_range(&games, "Big 12", 2000, 2020);
        assert!(!modern.contains("Nebraska"));
        assert!(modern.contains("Texas"));
    }
}
