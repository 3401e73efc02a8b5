use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::error::Result;

pub mod models;
use models::*;

/// Thread-safe SQLite connection (single connection with mutex).
///
/// This is the immutable cache boundary from the core's point of view: the
/// fetch subcommand writes here, every query command only reads.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite cache at the given path.
    pub fn open(path: &str) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Run schema migrations (idempotent).
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ── Games ────────────────────────────────────────────────────────────────

    /// Upsert one game, keyed on the provider's game id when present.
    pub fn upsert_game(&self, g: &Game) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO games (
                id, season, week, home_team, away_team, home_score, away_score,
                postseason, conference_game,
                home_conference, away_conference,
                home_classification, away_classification
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)
             ON CONFLICT(id) DO UPDATE SET
                home_score=excluded.home_score,
                away_score=excluded.away_score,
                postseason=excluded.postseason,
                conference_game=excluded.conference_game",
            params![
                g.id,
                g.season,
                g.week,
                g.home_team,
                g.away_team,
                g.home_score,
                g.away_score,
                g.postseason,
                g.conference_game,
                g.home_conference,
                g.away_conference,
                g.home_classification,
                g.away_classification,
            ],
        )?;
        Ok(())
    }

    /// Load every cached game, ordered by season then week.
    pub fn load_games(&self) -> Result<Vec<Game>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, season, week, home_team, away_team, home_score, away_score,
                    postseason, conference_game,
                    home_conference, away_conference,
                    home_classification, away_classification
             FROM games ORDER BY season, week",
        )?;
        let games = stmt
            .query_map([], map_game)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }

    pub fn count_games(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM games", [], |r| r.get(0))?;
        Ok(n)
    }

    // ── Teams ────────────────────────────────────────────────────────────────

    pub fn upsert_team(&self, t: &Team) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO teams (school, conference, classification)
             VALUES (?1,?2,?3)
             ON CONFLICT(school) DO UPDATE SET
                conference=excluded.conference,
                classification=excluded.classification",
            params![t.school, t.conference, t.classification],
        )?;
        Ok(())
    }

    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT school, conference, classification FROM teams ORDER BY school")?;
        let teams = stmt
            .query_map([], |row| {
                Ok(Team {
                    school: row.get(0)?,
                    conference: row.get(1)?,
                    classification: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }
}

fn map_game(row: &rusqlite::Row) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        season: row.get(1)?,
        week: row.get(2)?,
        home_team: row.get(3)?,
        away_team: row.get(4)?,
        home_score: row.get(5)?,
        away_score: row.get(6)?,
        postseason: row.get(7)?,
        conference_game: row.get(8)?,
        home_conference: row.get(9)?,
        away_conference: row.get(10)?,
        home_classification: row.get(11)?,
        away_classification: row.get(12)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS).
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    id                  INTEGER PRIMARY KEY,
    season              INTEGER NOT NULL,
    week                INTEGER NOT NULL,
    home_team           TEXT    NOT NULL,
    away_team           TEXT    NOT NULL,
    home_score          INTEGER NOT NULL,
    away_score          INTEGER NOT NULL,
    postseason          INTEGER NOT NULL DEFAULT 0,
    conference_game     INTEGER NOT NULL DEFAULT 0,
    home_conference     TEXT,
    away_conference     TEXT,
    home_classification TEXT,
    away_classification TEXT
);

CREATE TABLE IF NOT EXISTS teams (
    school         TEXT PRIMARY KEY,
    conference     TEXT,
    classification TEXT
);

CREATE INDEX IF NOT EXISTS idx_games_season ON games(season);
CREATE INDEX IF NOT EXISTS idx_games_home ON games(home_team);
CREATE INDEX IF NOT EXISTS idx_games_away ON games(away_team);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game(id: i64, season: i32) -> Game {
        Game {
            id: Some(id),
            season,
            week: 1,
            home_team: "Oregon".into(),
            away_team: "Idaho".into(),
            home_score: 24,
            away_score: 14,
            postseason: false,
            conference_game: false,
            home_conference: Some("Big Ten".into()),
            away_conference: Some("Big Sky".into()),
            home_classification: Some("fbs".into()),
            away_classification: Some("fcs".into()),
        }
    }

    #[test]
    fn games_round_trip() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_game(&sample_game(1, 2023)).unwrap();
        db.upsert_game(&sample_game(2, 2024)).unwrap();

        let games = db.load_games().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].season, 2023);
        assert_eq!(games[1].home_conference.as_deref(), Some("Big Ten"));
        assert_eq!(db.count_games().unwrap(), 2);
    }

    #[test]
    fn upsert_replaces_scores() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_game(&sample_game(1, 2024)).unwrap();
        let mut updated = sample_game(1, 2024);
        updated.home_score = 31;
        db.upsert_game(&updated).unwrap();

        let games = db.load_games().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_score, 31);
    }

    #[test]
    fn teams_round_trip() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_team(&Team {
            school: "Oregon".into(),
            conference: Some("Big Ten".into()),
            classification: Some("fbs".into()),
        })
        .unwrap();
        let teams = db.list_teams().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].school, "Oregon");
    }
}
