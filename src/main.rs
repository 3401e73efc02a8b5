use anyhow::Result;
use clap::Parser;
use std::collections::HashSet;
use tracing::info;

mod cfbd;
mod config;
mod db;
mod error;
mod graph;
mod membership;
mod names;
mod report;
mod scoring;
mod sos;
mod standard;
mod tiers;

use cfbd::CfbdClient;
use config::{Cli, Command, QueryArgs};
use db::models::Game;
use db::Database;
use error::GridrankError;
use graph::ScheduleGraph;
use scoring::{build_leaderboard, team_standing};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.database_path)?;

    match cli.command {
        Command::Fetch {
            api_key,
            start,
            end,
        } => {
            let end = end.unwrap_or_else(|| {
                use chrono::Datelike;
                chrono::Utc::now().year()
            });
            let client = CfbdClient::new(&api_key, None)?;
            let total = cfbd::sync_seasons(&client, &db, start, end).await?;
            info!(total, "fetch finished");
        }

        Command::Leaderboard { query, limit, json } => {
            query.validate()?;
            let games = load_cache(&db)?;
            let filter = query.to_filter(&games);
            let records = scoring::score(&games, &filter)?;
            let board = build_leaderboard(&records, query.min_games);
            if json {
                let top = &board[..board.len().min(limit)];
                println!("{}", serde_json::to_string_pretty(top)?);
            } else {
                print!("{}", report::render_leaderboard(&board, limit));
            }
        }

        Command::Team { name, query, json } => {
            query.validate()?;
            let games = load_cache(&db)?;
            let team = resolve_team(&games, &name)?;
            let filter = query.to_filter(&games);
            let records = scoring::score(&games, &filter)?;
            let standing = team_standing(&records, &team, query.min_games);
            if json {
                println!("{}", serde_json::to_string_pretty(&standing)?);
            } else {
                print!("{}", report::render_standing(&standing, &team));
            }
        }

        Command::Sos { name, query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            match name {
                Some(name) => {
                    let team = resolve_team(&games, &name)?;
                    let entries = sos::team_sos(&filtered, &team);
                    let header = format!("Strength of schedule: {team}");
                    print!("{}", report::render_sos(&entries, &header));
                }
                None => {
                    let entries = sos::sos_leaderboard(&filtered, report::LEADERBOARD_LIMIT);
                    print!("{}", report::render_sos(&entries, "Hardest schedules"));
                }
            }
        }

        Command::Conf { name, other, query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            let end = query.end_season();
            let members = membership::members_in_range(&games, &name, query.start, end);
            match other {
                Some(other) => {
                    let rivals = membership::members_in_range(&games, &other, query.start, end);
                    let s = standard::conference_showdown(&filtered, &members, &rivals);
                    print!("{}", report::render_showdown(&name, &other, &s));
                }
                None => {
                    let lines = standard::conference_report(&filtered, &members);
                    print!("{}", report::render_conference_report(&name, &lines));
                }
            }
        }

        Command::Rivalries { query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            let lines = standard::series_lines(&filtered);
            print!("{}", report::render_rivalries(&lines));
        }

        Command::Chain { from, to, query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            let from = resolve_team(&games, &from)?;
            let to = resolve_team(&games, &to)?;
            let graph = ScheduleGraph::build(&filtered);
            match graph.shortest_path(&from, &to) {
                Some(path) => print!("{}", report::render_chain(&graph, &path)),
                None => println!("No chain connects {from} and {to} in the selected range."),
            }
        }

        Command::Eccentricity { name, query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            let team = resolve_team(&games, &name)?;
            let graph = ScheduleGraph::build(&filtered);
            match graph.eccentricity(&team) {
                Some((distance, furthest)) => {
                    print!("{}", report::render_eccentricity(&team, distance, &furthest));
                }
                None => println!("{team} has no opponents in the selected range."),
            }
        }

        Command::Diameter { query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            let graph = ScheduleGraph::build(&filtered);
            match graph.diameter() {
                Some((d, path)) => {
                    println!("Diameter: {d}");
                    print!("{}", report::render_chain(&graph, &path));
                }
                None => println!("The schedule graph is empty for the selected range."),
            }
        }

        Command::Unplayed { name, query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            let team = resolve_team(&games, &name)?;
            let graph = ScheduleGraph::build(&filtered);
            let universe: HashSet<String> = graph.teams().map(str::to_string).collect();
            let never = graph.unplayed(&team, &universe);
            print!("{}", report::render_unplayed(&team, &never));
        }

        Command::Stats { query } => {
            let games = load_cache(&db)?;
            let filtered = filtered_games(&games, &query)?;
            println!("Cached games:      {}", db.count_games()?);
            println!("Known teams:       {}", db.list_teams()?.len());
            println!("Selected games:    {}", filtered.len());
            let graph = ScheduleGraph::build(&filtered);
            print!("{}", report::render_graph_stats(&graph.stats()));
        }
    }

    Ok(())
}

fn load_cache(db: &Database) -> Result<Vec<Game>, GridrankError> {
    let games = db.load_games()?;
    if games.is_empty() {
        return Err(GridrankError::EmptyCache);
    }
    Ok(games)
}

fn filtered_games(games: &[Game], query: &QueryArgs) -> Result<Vec<Game>, GridrankError> {
    let filter = query.to_filter(games);
    filter.validate()?;
    Ok(filter.apply(games))
}

/// Loose-match user input against every team name in the cache.
fn resolve_team(games: &[Game], input: &str) -> Result<String, GridrankError> {
    let universe = games
        .iter()
        .flat_map(|g| [g.home_team.as_str(), g.away_team.as_str()]);
    names::resolve(input, universe).ok_or_else(|| GridrankError::TeamNotFound(input.to_string()))
}
