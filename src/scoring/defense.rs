//! Season-long defensive averages, computed once before grading.

use std::collections::HashMap;

use crate::db::models::{Game, Side};

/// `(team, season) → average points allowed`, read-only input to the grader.
pub struct DefenseAverages {
    averages: HashMap<(String, i32), f64>,
}

impl DefenseAverages {
    pub fn build(games: &[Game]) -> Self {
        let mut totals: HashMap<(String, i32), (i64, u32)> = HashMap::new();
        for g in games {
            for side in [Side::Home, Side::Away] {
                let team = match side {
                    Side::Home => &g.home_team,
                    Side::Away => &g.away_team,
                };
                let (_, allowed) = g.scores_for(side);
                let entry = totals.entry((team.clone(), g.season)).or_insert((0, 0));
                entry.0 += allowed as i64;
                entry.1 += 1;
            }
        }
        let averages = totals
            .into_iter()
            .map(|(key, (sum, n))| (key, sum as f64 / n as f64))
            .collect();
        DefenseAverages { averages }
    }

    pub fn average_allowed(&self, team: &str, season: i32) -> Option<f64> {
        self.averages.get(&(team.to_string(), season)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn game(season: i32, home: &str, away: &str, hs: i32, aw: i32) -> Game {
        Game {
            id: None,
            season,
            week: 1,
            home_team: home.into(),
            away_team: away.into(),
            home_score: hs,
            away_score: aw,
            postseason: false,
            conference_game: false,
            home_conference: None,
            away_conference: None,
            home_classification: None,
            away_classification: None,
        }
    }

    #[test]
    fn averages_points_allowed_per_season() {
        let games = vec![
            game(2024, "A", "B", 30, 10),
            game(2024, "C", "A", 20, 14),
            game(2023, "A", "B", 0, 50),
        ];
        let d = DefenseAverages::build(&games);
        // A allowed 10 and 20 in 2024
        assert_relative_eq!(d.average_allowed("A", 2024).unwrap(), 15.0, epsilon = 1e-12);
        // Seasons are independent
        assert_relative_eq!(d.average_allowed("A", 2023).unwrap(), 50.0, epsilon = 1e-12);
        assert!(d.average_allowed("Z", 2024).is_none());
    }
}
