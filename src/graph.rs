//! The schedule graph: teams as nodes, "has ever played" as edges.
//!
//! Backs the connection-chain, eccentricity, diameter and never-played
//! queries. These are plain BFS over a static graph built from the filtered
//! game set; edge payloads keep indices into that set so chain rendering can
//! show series records and last meetings.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::db::models::Game;

pub struct ScheduleGraph<'a> {
    games: &'a [Game],
    /// team → opponent → indices into `games`
    adjacency: HashMap<&'a str, HashMap<&'a str, Vec<usize>>>,
}

#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub a_wins: u32,
    pub b_wins: u32,
    pub ties: u32,
    pub last_met: i32,
    /// Most recent meeting, formatted from team A's perspective ("W 31-24").
    pub last_result: String,
}

#[derive(Debug, Clone)]
pub struct GraphStats {
    pub teams: usize,
    pub matchups: usize,
    pub components: usize,
    pub largest_component: usize,
}

impl<'a> ScheduleGraph<'a> {
    pub fn build(games: &'a [Game]) -> Self {
        let mut adjacency: HashMap<&str, HashMap<&str, Vec<usize>>> = HashMap::new();
        for (i, g) in games.iter().enumerate() {
            adjacency
                .entry(&g.home_team)
                .or_default()
                .entry(&g.away_team)
                .or_default()
                .push(i);
            adjacency
                .entry(&g.away_team)
                .or_default()
                .entry(&g.home_team)
                .or_default()
                .push(i);
        }
        ScheduleGraph { games, adjacency }
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn contains(&self, team: &str) -> bool {
        self.adjacency.contains_key(team)
    }

    pub fn opponents_of(&self, team: &str) -> Vec<&str> {
        self.adjacency
            .get(team)
            .map(|n| n.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Shortest connection chain between two teams, endpoints included.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(vec![from.to_string()]);
        }

        let mut prev: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut seen: HashSet<&str> = HashSet::new();
        // Borrow the canonical key so lifetimes stay inside the graph
        let (&start, _) = self.adjacency.get_key_value(from)?;
        queue.push_back(start);
        seen.insert(start);

        while let Some(node) = queue.pop_front() {
            for &nbr in self.adjacency[node].keys() {
                if seen.insert(nbr) {
                    prev.insert(nbr, node);
                    if nbr == to {
                        let mut path = vec![nbr.to_string()];
                        let mut cur = nbr;
                        while let Some(&p) = prev.get(cur) {
                            path.push(p.to_string());
                            cur = p;
                        }
                        path.reverse();
                        return Some(path);
                    }
                    queue.push_back(nbr);
                }
            }
        }
        None
    }

    /// Distance from one team to every reachable team.
    fn distances(&self, from: &str) -> HashMap<&str, usize> {
        let mut dist: HashMap<&str, usize> = HashMap::new();
        let Some((&start, _)) = self.adjacency.get_key_value(from) else {
            return dist;
        };
        let mut queue: VecDeque<&str> = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            let d = dist[node];
            for &nbr in self.adjacency[node].keys() {
                if !dist.contains_key(nbr) {
                    dist.insert(nbr, d + 1);
                    queue.push_back(nbr);
                }
            }
        }
        dist
    }

    /// The furthest reachable team(s) from the given team and the distance.
    pub fn eccentricity(&self, team: &str) -> Option<(usize, Vec<String>)> {
        let dist = self.distances(team);
        let max = *dist.values().max()?;
        if max == 0 {
            return None;
        }
        let mut far: Vec<String> = dist
            .iter()
            .filter(|(_, &d)| d == max)
            .map(|(t, _)| t.to_string())
            .collect();
        far.sort();
        Some((max, far))
    }

    /// League diameter over the largest connected component, with one witness
    /// path of exactly that length.
    pub fn diameter(&self) -> Option<(usize, Vec<String>)> {
        let component = self.largest_component()?;

        let mut best: Option<(usize, &str, &str)> = None;
        for &node in &component {
            let dist = self.distances(node);
            if let Some((&far, &d)) = dist.iter().max_by_key(|(_, &d)| d) {
                if best.map(|(b, _, _)| d > b).unwrap_or(true) {
                    best = Some((d, node, far));
                }
            }
        }
        let (d, from, to) = best?;
        if d == 0 {
            return None;
        }
        let path = self.shortest_path(from, to)?;
        Some((d, path))
    }

    fn largest_component(&self) -> Option<Vec<&str>> {
        let mut unseen: HashSet<&str> = self.adjacency.keys().copied().collect();
        let mut largest: Vec<&str> = Vec::new();
        while let Some(&seed) = unseen.iter().next() {
            let dist = self.distances(seed);
            let component: Vec<&str> = dist.keys().copied().collect();
            for t in &component {
                unseen.remove(t);
            }
            if component.len() > largest.len() {
                largest = component;
            }
        }
        if largest.is_empty() {
            None
        } else {
            Some(largest)
        }
    }

    /// Head-to-head record between two teams, from `a`'s perspective.
    pub fn series(&self, a: &str, b: &str) -> Option<SeriesSummary> {
        let indices = self.adjacency.get(a)?.get(b)?;
        let mut summary = SeriesSummary {
            a_wins: 0,
            b_wins: 0,
            ties: 0,
            last_met: i32::MIN,
            last_result: String::new(),
        };
        let mut last: Option<&Game> = None;
        for &i in indices {
            let g = &self.games[i];
            let side = g.side_of(a)?;
            let (us, them) = g.scores_for(side);
            match us.cmp(&them) {
                std::cmp::Ordering::Greater => summary.a_wins += 1,
                std::cmp::Ordering::Less => summary.b_wins += 1,
                std::cmp::Ordering::Equal => summary.ties += 1,
            }
            if g.season >= summary.last_met {
                summary.last_met = g.season;
                last = Some(g);
            }
        }
        if let Some(g) = last {
            let side = g.side_of(a)?;
            let (us, them) = g.scores_for(side);
            let letter = match us.cmp(&them) {
                std::cmp::Ordering::Greater => 'W',
                std::cmp::Ordering::Less => 'L',
                std::cmp::Ordering::Equal => 'T',
            };
            summary.last_result = format!("{letter} {us}-{them}");
        }
        Some(summary)
    }

    /// Teams in `universe` the given team has never faced.
    pub fn unplayed(&self, team: &str, universe: &HashSet<String>) -> Vec<String> {
        let played: HashSet<&str> = self.opponents_of(team).into_iter().collect();
        let mut never: Vec<String> = universe
            .iter()
            .filter(|t| t.as_str() != team && !played.contains(t.as_str()))
            .cloned()
            .collect();
        never.sort();
        never
    }

    pub fn stats(&self) -> GraphStats {
        let teams = self.adjacency.len();
        let matchups = self
            .adjacency
            .values()
            .map(|n| n.len())
            .sum::<usize>()
            / 2;

        let mut unseen: HashSet<&str> = self.adjacency.keys().copied().collect();
        let mut components = 0;
        let mut largest = 0;
        while let Some(&seed) = unseen.iter().next() {
            let dist = self.distances(seed);
            components += 1;
            largest = largest.max(dist.len());
            for t in dist.keys() {
                unseen.remove(t);
            }
        }

        GraphStats {
            teams,
            matchups,
            components,
            largest_component: largest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    // A–B–C–D chain plus isolated E–F pair
    fn games() -> Vec<Game> {
        vec![
            game(2020, "A", "B", 28, 14),
            game(2021, "B", "C", 7, 10),
            game(2022, "C", "D", 21, 21),
            game(2022, "E", "F", 35, 3),
            game(2023, "A", "B", 17, 20),
        ]
    }

    #[test]
    fn direct_opponents_are_one_hop() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let path = graph.shortest_path("A", "B").unwrap();
        assert_eq!(path, vec!["A", "B"]);
    }

    #[test]
    fn chain_spans_intermediate_teams() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let path = graph.shortest_path("A", "D").unwrap();
        assert_eq!(path, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn disconnected_teams_have_no_path() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        assert!(graph.shortest_path("A", "E").is_none());
        assert!(graph.shortest_path("A", "Nobody").is_none());
    }

    #[test]
    fn eccentricity_finds_the_far_end() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let (dist, far) = graph.eccentricity("A").unwrap();
        assert_eq!(dist, 3);
        assert_eq!(far, vec!["D".to_string()]);
    }

    #[test]
    fn diameter_uses_largest_component() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let (d, path) = graph.diameter().unwrap();
        assert_eq!(d, 3);
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn series_counts_and_last_meeting() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let s = graph.series("A", "B").unwrap();
        assert_eq!((s.a_wins, s.b_wins, s.ties), (1, 1, 0));
        assert_eq!(s.last_met, 2023);
        assert_eq!(s.last_result, "L 17-20");

        let t = graph.series("C", "D").unwrap();
        assert_eq!(t.ties, 1);
    }

    #[test]
    fn unplayed_excludes_self_and_opponents() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let universe: HashSet<String> =
            ["A", "B", "C", "D", "E", "F"].iter().map(|s| s.to_string()).collect();
        let never = graph.unplayed("A", &universe);
        assert_eq!(never, vec!["C", "D", "E", "F"]);
    }

    #[test]
    fn stats_summarize_topology() {
        let gs = games();
        let graph = ScheduleGraph::build(&gs);
        let stats = graph.stats();
        assert_eq!(stats.teams, 6);
        assert_eq!(stats.matchups, 4);
        assert_eq!(stats.components, 2);
        assert_eq!(stats.largest_component, 4);
    }
}
