/// One historical game, as cached from the data provider.
///
/// Scores are final; rows with missing scores are dropped at fetch time.
/// The per-side conference and classification strings record what was true
/// *when the game was played*, which is what the tier resolver and the
/// division filter operate on (a team's division can change between seasons).
#[derive(Debug, Clone)]
pub struct Game {
    pub id: Option<i64>,
    pub season: i32,
    pub week: i32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub postseason: bool,
    pub conference_game: bool,
    pub home_conference: Option<String>,
    pub away_conference: Option<String>,
    /// "fbs" | "fcs" | "ii" | "iii"
    pub home_classification: Option<String>,
    pub away_classification: Option<String>,
}

impl Game {
    /// Which side of this game a team played on, if it played at all.
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home_team == team {
            Some(Side::Home)
        } else if self.away_team == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn opponent_of(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.away_team,
            Side::Away => &self.home_team,
        }
    }

    /// (points scored, points allowed) from one side's perspective.
    pub fn scores_for(&self, side: Side) -> (i32, i32) {
        match side {
            Side::Home => (self.home_score, self.away_score),
            Side::Away => (self.away_score, self.home_score),
        }
    }

    pub fn conference_of(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.home_conference.as_deref(),
            Side::Away => self.away_conference.as_deref(),
        }
    }

    pub fn classification_of(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.home_classification.as_deref(),
            Side::Away => self.away_classification.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn flip(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A team from the provider's team database (current-day snapshot).
#[derive(Debug, Clone)]
pub struct Team {
    pub school: String,
    pub conference: Option<String>,
    pub classification: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game {
            id: None,
            season: 2024,
            week: 5,
            home_team: "Oregon".into(),
            away_team: "Ohio State".into(),
            home_score: 32,
            away_score: 31,
            postseason: false,
            conference_game: true,
            home_conference: Some("Big Ten".into()),
            away_conference: Some("Big Ten".into()),
            home_classification: Some("fbs".into()),
            away_classification: Some("fbs".into()),
        }
    }

    #[test]
    fn side_resolution() {
        let g = game();
        assert_eq!(g.side_of("Oregon"), Some(Side::Home));
        assert_eq!(g.side_of("Ohio State"), Some(Side::Away));
        assert_eq!(g.side_of("Michigan"), None);
    }

    #[test]
    fn perspective_scores() {
        let g = game();
        assert_eq!(g.scores_for(Side::Home), (32, 31));
        assert_eq!(g.scores_for(Side::Away), (31, 32));
        assert_eq!(g.opponent_of(Side::Home), "Ohio State");
    }
}
