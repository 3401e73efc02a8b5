use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::db::models::{Game, Team};
use crate::db::Database;

/// Source of historical games and the team database.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// All completed games for one season, regular and postseason.
    async fn fetch_games(&self, year: i32) -> Result<Vec<Game>>;

    /// The current team database (name, conference, classification).
    async fn fetch_teams(&self) -> Result<Vec<Team>>;
}

/// Historical game provider backed by the CollegeFootballData API.
/// Docs: <https://api.collegefootballdata.com/api/docs>
pub struct CfbdClient {
    http: Client,
    api_key: String,
    /// Base URL for overriding in tests
    base_url: String,
}

impl CfbdClient {
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(CfbdClient {
            http,
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or("https://api.collegefootballdata.com")
                .to_string(),
        })
    }
}

#[async_trait]
impl GameSource for CfbdClient {
    async fn fetch_games(&self, year: i32) -> Result<Vec<Game>> {
        let url = format!("{}/games?year={}&seasonType=both", self.base_url, year);
        debug!("Fetching games from {}", url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("CFBD games request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("CFBD error for {}: {}", year, resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse CFBD games response")?;

        Ok(parse_games_response(&raw))
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        let url = format!("{}/teams", self.base_url);
        debug!("Fetching teams from {}", url);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("CFBD teams request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("CFBD error: {}", resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse CFBD teams response")?;

        Ok(parse_teams_response(&raw))
    }
}

fn parse_games_response(raw: &serde_json::Value) -> Vec<Game> {
    let rows = match raw.as_array() {
        Some(a) => a,
        None => return vec![],
    };

    rows.iter()
        .filter_map(|row| {
            // Unfinished or forfeited games come back without scores; skip them
            let home_score = int_field(row, "homePoints")?;
            let away_score = int_field(row, "awayPoints")?;
            Some(Game {
                id: row["id"].as_i64(),
                season: int_field(row, "season")?,
                week: int_field(row, "week").unwrap_or(0),
                home_team: row["homeTeam"].as_str()?.to_string(),
                away_team: row["awayTeam"].as_str()?.to_string(),
                home_score,
                away_score,
                postseason: row["seasonType"].as_str() == Some("postseason"),
                conference_game: row["conferenceGame"].as_bool().unwrap_or(false),
                home_conference: row["homeConference"].as_str().map(str::to_string),
                away_conference: row["awayConference"].as_str().map(str::to_string),
                home_classification: row["homeClassification"].as_str().map(str::to_string),
                away_classification: row["awayClassification"].as_str().map(str::to_string),
            })
        })
        .collect()
}

fn parse_teams_response(raw: &serde_json::Value) -> Vec<Team> {
    let rows = match raw.as_array() {
        Some(a) => a,
        None => return vec![],
    };

    rows.iter()
        .filter_map(|row| {
            Some(Team {
                school: row["school"].as_str()?.to_string(),
                conference: row["conference"].as_str().map(str::to_string),
                classification: row["classification"].as_str().map(str::to_string),
            })
        })
        .collect()
}

fn int_field(row: &serde_json::Value, key: &str) -> Option<i32> {
    row[key].as_i64().map(|v| v as i32)
}

/// Fetch a range of seasons into the local cache, one API call per season.
/// Seasons that come back empty are logged and skipped rather than treated
/// as errors; early years legitimately have no data.
pub async fn sync_seasons(
    source: &dyn GameSource,
    db: &Database,
    start_season: i32,
    end_season: i32,
) -> Result<usize> {
    let mut total = 0;
    for year in start_season..=end_season {
        let games = source.fetch_games(year).await?;
        if games.is_empty() {
            warn!(year, "no completed games returned");
            continue;
        }
        let count = games.len();
        for game in &games {
            db.upsert_game(game)?;
        }
        total += count;
        info!(year, count, "cached season");
    }

    let teams = source.fetch_teams().await?;
    for team in &teams {
        db.upsert_team(team)?;
    }
    info!(teams = teams.len(), total, "sync complete");
    Ok(total)
}
