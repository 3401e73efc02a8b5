//! Query-scoped game selection.
//!
//! A filter is a set of independent predicates AND-ed together; combining
//! them in any order yields the same game set. An empty result is a valid
//! outcome and flows downstream as "no qualifying games".

use std::collections::HashSet;

use crate::db::models::{Game, Side};
use crate::error::{GridrankError, Result};

#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub start_season: i32,
    pub end_season: i32,
    pub week_range: Option<(i32, i32)>,
    /// Division classifications (lowercase). Both participants must belong,
    /// resolved from the game row itself, so eligibility tracks the season.
    pub divisions: Option<HashSet<String>>,
    /// Lineage-expanded conference member set; at least one participant must
    /// be a member.
    pub conference_teams: Option<HashSet<String>>,
    /// Keep only conference games.
    pub conference_only: bool,
    /// Keep only non-conference games.
    pub non_conference: bool,
    pub include_postseason: bool,
}

impl GameFilter {
    pub fn seasons(start: i32, end: i32) -> Self {
        GameFilter {
            start_season: start,
            end_season: end,
            include_postseason: true,
            ..Default::default()
        }
    }

    /// Reject malformed ranges before any grading work starts.
    pub fn validate(&self) -> Result<()> {
        if self.start_season > self.end_season {
            return Err(GridrankError::InvalidRange(format!(
                "start season {} is after end season {}",
                self.start_season, self.end_season
            )));
        }
        if let Some((lo, hi)) = self.week_range {
            if lo > hi {
                return Err(GridrankError::InvalidRange(format!(
                    "week range {lo}–{hi} is inverted"
                )));
            }
        }
        if self.conference_only && self.non_conference {
            return Err(GridrankError::InvalidRange(
                "conference-only and non-conference are mutually exclusive".into(),
            ));
        }
        Ok(())
    }

    pub fn matches(&self, g: &Game) -> bool {
        if g.season < self.start_season || g.season > self.end_season {
            return false;
        }
        if let Some((lo, hi)) = self.week_range {
            if g.week < lo || g.week > hi {
                return false;
            }
        }
        if !self.include_postseason && g.postseason {
            return false;
        }
        if self.conference_only && !g.conference_game {
            return false;
        }
        if self.non_conference && g.conference_game {
            return false;
        }
        if let Some(divs) = &self.divisions {
            let in_div = |side| {
                g.classification_of(side)
                    .map(|c| divs.contains(&c.to_ascii_lowercase()))
                    .unwrap_or(false)
            };
            if !in_div(Side::Home) || !in_div(Side::Away) {
                return false;
            }
        }
        if let Some(members) = &self.conference_teams {
            if !members.contains(&g.home_team) && !members.contains(&g.away_team) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, games: &[Game]) -> Vec<Game> {
        games.iter().filter(|g| self.matches(g)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(season: i32, week: i32, postseason: bool, conference_game: bool) -> Game {
        Game {
            id: None,
            season,
            week,
            home_team: "A".into(),
            away_team: "B".into(),
            home_score: 21,
            away_score: 14,
            postseason,
            conference_game,
            home_conference: None,
            away_conference: None,
            home_classification: Some("fbs".into()),
            away_classification: Some("fcs".into()),
        }
    }

    fn sample() -> Vec<Game> {
        vec![
            game(2020, 3, false, true),
            game(2021, 1, false, false),
            game(2021, 16, true, false),
            game(2022, 8, false, true),
        ]
    }

    #[test]
    fn season_range() {
        let f = GameFilter::seasons(2021, 2022);
        assert_eq!(f.apply(&sample()).len(), 3);
    }

    #[test]
    fn week_range() {
        let mut f = GameFilter::seasons(2020, 2022);
        f.week_range = Some((1, 8));
        assert_eq!(f.apply(&sample()).len(), 3);
    }

    #[test]
    fn postseason_toggle() {
        let mut f = GameFilter::seasons(2020, 2022);
        f.include_postseason = false;
        assert_eq!(f.apply(&sample()).len(), 3);
    }

    #[test]
    fn conference_toggles() {
        let mut f = GameFilter::seasons(2020, 2022);
        f.conference_only = true;
        assert_eq!(f.apply(&sample()).len(), 2);
        f.conference_only = false;
        f.non_conference = true;
        assert_eq!(f.apply(&sample()).len(), 2);
    }

    #[test]
    fn division_requires_both_sides() {
        let mut f = GameFilter::seasons(2020, 2022);
        f.divisions = Some(["fbs".to_string()].into());
        // Every sample game is fbs-vs-fcs, so nothing passes
        assert!(f.apply(&sample()).is_empty());
        f.divisions = Some(["fbs".to_string(), "fcs".to_string()].into());
        assert_eq!(f.apply(&sample()).len(), 4);
    }

    #[test]
    fn conference_membership_either_side() {
        let mut f = GameFilter::seasons(2020, 2022);
        f.conference_teams = Some(["A".to_string()].into());
        assert_eq!(f.apply(&sample()).len(), 4);
        f.conference_teams = Some(["Z".to_string()].into());
        assert!(f.apply(&sample()).is_empty());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let f = GameFilter::seasons(1950, 1951);
        assert!(f.validate().is_ok());
        assert!(f.apply(&sample()).is_empty());
    }

    #[test]
    fn inverted_ranges_rejected() {
        let f = GameFilter::seasons(2024, 2020);
        assert!(matches!(
            f.validate().unwrap_err(),
            GridrankError::InvalidRange(_)
        ));
        let mut f = GameFilter::seasons(2020, 2024);
        f.week_range = Some((9, 2));
        assert!(f.validate().is_err());
    }

    #[test]
    fn predicates_commute() {
        // season-then-division equals division-then-season
        let season_only = GameFilter::seasons(2021, 2022);
        let mut div_only = GameFilter::seasons(i32::MIN, i32::MAX);
        div_only.divisions = Some(["fbs".to_string(), "fcs".to_string()].into());

        let a = div_only.apply(&season_only.apply(&sample()));
        let b = season_only.apply(&div_only.apply(&sample()));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!((x.season, x.week), (y.season, y.week));
        }
    }
}
