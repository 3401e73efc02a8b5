use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;

use chrono::Datelike;

use crate::db::models::Game;
use crate::error::GridrankError;
use crate::membership;
use crate::scoring::{GameFilter, DEFAULT_MIN_GAMES};

/// College football Strength of Record rankings
#[derive(Parser, Debug)]
#[command(name = "gridrank", version, about)]
pub struct Cli {
    /// SQLite database path
    #[arg(long, env = "GRIDRANK_DB", default_value = "gridrank.db", global = true)]
    pub database_path: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch seasons from the CollegeFootballData API into the local cache
    Fetch {
        /// CFBD API key (free at collegefootballdata.com)
        #[arg(long, env = "CFBD_API_KEY")]
        api_key: String,

        /// First season to fetch
        #[arg(long, default_value = "1869")]
        start: i32,

        /// Last season to fetch (defaults to the current year)
        #[arg(long)]
        end: Option<i32>,
    },

    /// Print the Strength of Record leaderboard
    Leaderboard {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of teams to print
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Emit JSON instead of the text table
        #[arg(long)]
        json: bool,
    },

    /// Print one team's record with per-game grade breakdown
    Team {
        /// Team name (loose matching: case, accents and punctuation ignored)
        name: String,

        #[command(flatten)]
        query: QueryArgs,

        /// Emit JSON instead of the text breakdown
        #[arg(long)]
        json: bool,
    },

    /// Strength of schedule, per season
    Sos {
        /// Team name; omit for the hardest-schedule leaderboard
        name: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Conference win-pct report, or a two-conference head-to-head showdown
    Conf {
        /// Conference name (historical names in the same lineage count)
        name: String,

        /// Second conference; when given, prints the head-to-head record
        /// instead of the member leaderboard
        other: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// League-wide rivalry tables: most played, most one-sided, biggest gaps
    Rivalries {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Shortest connection chain between two teams
    Chain {
        from: String,
        to: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// A team's most distant opponents in the schedule graph
    Eccentricity {
        name: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// The longest shortest chain in the schedule graph
    Diameter {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Teams a given team has never faced
    Unplayed {
        name: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Cache and schedule-graph summary
    Stats {
        #[command(flatten)]
        query: QueryArgs,
    },
}

/// Shared filter flags for every query command.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// First season to include
    #[arg(long, default_value = "1869")]
    pub start: i32,

    /// Last season to include (defaults to the current year)
    #[arg(long)]
    pub end: Option<i32>,

    /// First week to include
    #[arg(long)]
    pub start_week: Option<i32>,

    /// Last week to include
    #[arg(long)]
    pub end_week: Option<i32>,

    /// Division classification(s): fbs, fcs, ii, iii. Both participants of a
    /// game must belong. Repeatable.
    #[arg(long = "div")]
    pub divisions: Vec<String>,

    /// Conference filter; historical names in the same lineage count
    #[arg(long = "conf")]
    pub conference: Option<String>,

    /// Keep only conference games
    #[arg(long)]
    pub conf_only: bool,

    /// Keep only non-conference games
    #[arg(long)]
    pub non_conf: bool,

    /// Exclude bowl and playoff games
    #[arg(long)]
    pub no_postseason: bool,

    /// Minimum qualifying games to be ranked
    #[arg(long, default_value_t = DEFAULT_MIN_GAMES)]
    pub min_games: usize,
}

impl QueryArgs {
    pub fn end_season(&self) -> i32 {
        self.end.unwrap_or_else(|| chrono::Utc::now().year())
    }

    /// Flag-level checks that the filter itself cannot express.
    pub fn validate(&self) -> Result<(), GridrankError> {
        if self.min_games == 0 {
            return Err(GridrankError::InvalidRange(
                "min-games must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Build the game filter, resolving conference membership against the
    /// cached games so historical members are included.
    pub fn to_filter(&self, games: &[Game]) -> GameFilter {
        let end = self.end_season();
        let mut filter = GameFilter::seasons(self.start, end);
        filter.include_postseason = !self.no_postseason;
        filter.conference_only = self.conf_only;
        filter.non_conference = self.non_conf;

        filter.week_range = match (self.start_week, self.end_week) {
            (None, None) => None,
            (lo, hi) => Some((lo.unwrap_or(0), hi.unwrap_or(i32::MAX))),
        };

        if !self.divisions.is_empty() {
            let divs: HashSet<String> = self
                .divisions
                .iter()
                .map(|d| d.to_ascii_lowercase())
                .collect();
            filter.divisions = Some(divs);
        }

        if let Some(conf) = &self.conference {
            filter.conference_teams =
                Some(membership::members_in_range(games, conf, self.start, end));
        }

        filter
    }
}
