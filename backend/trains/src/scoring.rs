use crate::board::RailConnection;
use crate::city::CityPair;
use crate::record::ParticipantRecord;

use smallvec::SmallVec;
use std::cmp::max;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub const POINTS_PER_SEGMENT: i32 = 1;
pub const CONNECTED_DESTINATION_POINTS: i32 = 10;
pub const DISCONNECTED_DESTINATION_POINTS: i32 = -10;
pub const LONGEST_PATH_BONUS: i32 = 20;

/// Few cities have more than a handful of neighbors, so adjacency lists stay on the stack.
const MAX_INLINE_NEIGHBORS: usize = 4;

/// Undirected graph of the connections owned by a single participant.
///
/// Vertices are the cities touched by at least one owned connection. Between two cities, only the
/// longest owned connection is kept as an edge, so parallel connections never make a path longer.
#[derive(Clone, Debug, Default)]
pub struct ScoreGraph {
    /// Maps each city name to its vertex index.
    vertices: BTreeMap<String, usize>,
    /// Neighbors of each vertex, with the length of the edge joining them.
    neighbors: Vec<SmallVec<[(usize, u32); MAX_INLINE_NEIGHBORS]>>,
}

impl ScoreGraph {
    pub fn from_connections<'a>(connections: impl IntoIterator<Item = &'a RailConnection>) -> Self {
        let mut graph = Self::default();
        let mut edges: BTreeMap<(usize, usize), u32> = BTreeMap::new();

        for connection in connections {
            let cities = connection.cities();
            let first = graph.vertex(cities.first().name());
            let second = graph.vertex(cities.second().name());

            let length = edges.entry((first, second)).or_default();
            *length = max(*length, connection.length().value());
        }

        for ((first, second), length) in edges {
            graph.neighbors[first].push((second, length));
            graph.neighbors[second].push((first, length));
        }

        graph
    }

    fn vertex(&mut self, name: &str) -> usize {
        if let Some(index) = self.vertices.get(name) {
            return *index;
        }

        let index = self.neighbors.len();
        self.vertices.insert(name.to_owned(), index);
        self.neighbors.push(SmallVec::new());
        index
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    /// Total length of the longest simple path of the graph, i.e. one that never visits a city twice.
    ///
    /// Every simple path is explored from every vertex, which is fine for the few dozen
    /// connections a participant can own.
    ///
    /// # Example
    /// ```
    /// use trains::board::{RailConnection, SegmentLength};
    /// use trains::city::City;
    /// use trains::color::RailColor;
    /// use trains::scoring::ScoreGraph;
    ///
    /// let (a, b, c, d) = (
    ///     City::new("A", 0, 0),
    ///     City::new("B", 0, 0),
    ///     City::new("C", 0, 0),
    ///     City::new("D", 0, 0),
    /// );
    /// // A star centered on B: the longest path must pick two of its branches.
    /// let connections = [
    ///     RailConnection::between(&a, &b, SegmentLength::Three, RailColor::Red).unwrap(),
    ///     RailConnection::between(&b, &c, SegmentLength::Four, RailColor::Red).unwrap(),
    ///     RailConnection::between(&b, &d, SegmentLength::Five, RailColor::Red).unwrap(),
    /// ];
    ///
    /// assert_eq!(ScoreGraph::from_connections(&connections).longest_path(), 9);
    /// ```
    pub fn longest_path(&self) -> u32 {
        let mut visited = vec![false; self.num_vertices()];

        (0..self.num_vertices())
            .map(|start| self.longest_path_from(start, &mut visited))
            .max()
            .unwrap_or(0)
    }

    fn longest_path_from(&self, start: usize, visited: &mut [bool]) -> u32 {
        visited[start] = true;

        let mut longest_path_from_vertex = 0;
        for (end, length) in &self.neighbors[start] {
            if visited[*end] {
                continue;
            }

            longest_path_from_vertex = max(
                longest_path_from_vertex,
                length + self.longest_path_from(*end, visited),
            );
        }

        visited[start] = false;
        longest_path_from_vertex
    }

    /// Whether both cities are in the graph and some path joins them.
    pub fn connects(&self, cities: &CityPair) -> bool {
        let (start, end) = match (
            self.vertices.get(cities.first().name()),
            self.vertices.get(cities.second().name()),
        ) {
            (Some(start), Some(end)) => (*start, *end),
            _ => return false,
        };

        let mut visited = vec![false; self.num_vertices()];
        let mut to_visit = VecDeque::from([start]);
        visited[start] = true;

        while let Some(vertex) = to_visit.pop_front() {
            if vertex == end {
                return true;
            }

            for (neighbor, _) in &self.neighbors[vertex] {
                if !visited[*neighbor] {
                    visited[*neighbor] = true;
                    to_visit.push_back(*neighbor);
                }
            }
        }

        false
    }
}

/// Indices of the participants whose longest path is the longest of all.
///
/// When everyone ties, everyone is included, even if nobody owns a single connection.
pub fn players_with_longest_path(longest_paths: &[u32]) -> BTreeSet<usize> {
    let longest = match longest_paths.iter().max() {
        Some(longest) => *longest,
        None => return BTreeSet::new(),
    };

    longest_paths
        .iter()
        .enumerate()
        .filter(|(_, path)| **path == longest)
        .map(|(index, _)| index)
        .collect()
}

/// Final score of every participant, in the same order as the given records.
///
/// A score sums:
///   * One point per segment of every owned connection.
///   * 10 points per connected destination, and -10 per disconnected one.
///   * 20 points if the participant has (one of) the longest path(s).
pub fn score_all(records: &[ParticipantRecord]) -> Vec<i32> {
    let graphs: Vec<ScoreGraph> = records
        .iter()
        .map(|record| ScoreGraph::from_connections(record.owned_connections()))
        .collect();

    let longest_paths: Vec<u32> = graphs.iter().map(ScoreGraph::longest_path).collect();
    let longest_path_holders = players_with_longest_path(&longest_paths);

    records
        .iter()
        .zip(&graphs)
        .enumerate()
        .map(|(index, (record, graph))| {
            let segments: i32 = record
                .owned_connections()
                .iter()
                .map(|connection| connection.length().value() as i32 * POINTS_PER_SEGMENT)
                .sum();

            let destinations: i32 = record
                .destinations()
                .iter()
                .map(|destination| {
                    if graph.connects(destination.cities()) {
                        CONNECTED_DESTINATION_POINTS
                    } else {
                        DISCONNECTED_DESTINATION_POINTS
                    }
                })
                .sum();

            let bonus = if longest_path_holders.contains(&index) {
                LONGEST_PATH_BONUS
            } else {
                0
            };

            segments + destinations + bonus
        })
        .collect()
}
