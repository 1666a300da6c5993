use crate::city::{City, CityPair};
use crate::color::RailColor;

use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// The lengths a rail connection can have.
///
/// This is also the number of cards, and the number of pieces, needed to acquire it.
///
/// # JSON
/// Lengths are serialized as an 8-bit unsigned integer.
#[derive(
    Clone, Copy, Debug, Deserialize_repr, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize_repr,
)]
#[repr(u8)]
pub enum SegmentLength {
    Three = 3,
    Four = 4,
    Five = 5,
}

impl SegmentLength {
    #[inline]
    pub fn value(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u8> for SegmentLength {
    type Error = String;

    fn try_from(length: u8) -> Result<Self, Self::Error> {
        match length {
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            _ => Err(format!(
                "A connection cannot be of length {}: only 3, 4 and 5 are allowed.",
                length
            )),
        }
    }
}

impl fmt::Display for SegmentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A rail connection between two distinct cities, which can be acquired by at most one participant.
///
/// Two connections are the same if and only if they join the same cities with the same color:
/// the length is not part of a connection's identity. Hence, two cities can only be joined by
/// connections of different lengths if they also have different colors.
#[derive(Clone, Debug, Serialize)]
pub struct RailConnection {
    cities: CityPair,
    length: SegmentLength,
    color: RailColor,
}

impl RailConnection {
    pub fn new(cities: CityPair, length: SegmentLength, color: RailColor) -> Self {
        Self {
            cities,
            length,
            color,
        }
    }

    /// Convenience constructor from two cities, returning `None` if they are the same.
    pub fn between(a: &City, b: &City, length: SegmentLength, color: RailColor) -> Option<Self> {
        CityPair::new(a.clone(), b.clone()).map(|cities| Self::new(cities, length, color))
    }

    #[inline]
    pub fn cities(&self) -> &CityPair {
        &self.cities
    }

    #[inline]
    pub fn length(&self) -> SegmentLength {
        self.length
    }

    #[inline]
    pub fn color(&self) -> RailColor {
        self.color
    }

    /// Total ordering over cities, then length, then color.
    ///
    /// Unlike [`Ord`], this distinguishes connections that only differ by their length.
    pub fn lexicographic_cmp(&self, other: &Self) -> Ordering {
        self.cities
            .cmp(&other.cities)
            .then(self.length.cmp(&other.length))
            .then(self.color.cmp(&other.color))
    }
}

impl PartialEq for RailConnection {
    fn eq(&self, other: &Self) -> bool {
        self.cities == other.cities && self.color == other.color
    }
}

impl Eq for RailConnection {}

impl Hash for RailConnection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cities.hash(state);
        self.color.hash(state);
    }
}

impl PartialOrd for RailConnection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RailConnection {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cities
            .cmp(&other.cities)
            .then(self.color.cmp(&other.color))
    }
}

impl fmt::Display for RailConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.cities, self.length, self.color)
    }
}

/// Reasons a [`Board`] cannot be built.
#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("City `{0}` appears more than once on the board.")]
    DuplicateCity(String),
    #[error("Connection {0} joins a city that is not on the board.")]
    UnknownCity(String),
    #[error("Connection {0} appears more than once on the board.")]
    DuplicateConnection(String),
}

/// The static board of a game: its cities, and the rail connections between them.
///
/// Immutable once built, and only ever queried.
#[derive(Clone, Debug, Serialize)]
pub struct Board {
    cities: BTreeSet<City>,
    connections: BTreeSet<RailConnection>,
}

impl Board {
    /// Builds a board from its cities and connections.
    ///
    /// Returns an `Err` if either:
    ///   * Two cities share the same name.
    ///   * A connection joins a city that was not given.
    ///   * Two connections have the same identity (same cities, same color).
    ///
    /// # Example
    /// ```
    /// use trains::board::{Board, RailConnection, SegmentLength};
    /// use trains::city::City;
    /// use trains::color::RailColor;
    ///
    /// let austin = City::new("Austin", 0, 0);
    /// let boston = City::new("Boston", 10, 10);
    /// let connection =
    ///     RailConnection::between(&austin, &boston, SegmentLength::Three, RailColor::Red).unwrap();
    ///
    /// let board = Board::new([austin, boston], [connection]);
    /// assert!(board.is_ok());
    /// assert_eq!(board.unwrap().all_possible_destinations().len(), 1);
    /// ```
    pub fn new(
        cities: impl IntoIterator<Item = City>,
        connections: impl IntoIterator<Item = RailConnection>,
    ) -> Result<Self, BoardError> {
        let mut all_cities = BTreeSet::new();
        for city in cities {
            let name = city.name().to_owned();
            if !all_cities.insert(city) {
                return Err(BoardError::DuplicateCity(name));
            }
        }

        let mut all_connections = BTreeSet::new();
        for connection in connections {
            let cities = connection.cities();
            if !all_cities.contains(cities.first()) || !all_cities.contains(cities.second()) {
                return Err(BoardError::UnknownCity(connection.to_string()));
            }

            let description = connection.to_string();
            if !all_connections.insert(connection) {
                return Err(BoardError::DuplicateConnection(description));
            }
        }

        Ok(Self {
            cities: all_cities,
            connections: all_connections,
        })
    }

    #[inline]
    pub fn cities(&self) -> &BTreeSet<City> {
        &self.cities
    }

    #[inline]
    pub fn connections(&self) -> &BTreeSet<RailConnection> {
        &self.connections
    }

    /// Looks up the board's connection with the same identity (cities and color) as the given one.
    #[inline]
    pub fn connection(&self, connection: &RailConnection) -> Option<&RailConnection> {
        self.connections.get(connection)
    }

    /// All pairs of distinct cities that are joined by some path of connections on this board,
    /// regardless of who owns them.
    pub fn all_possible_destinations(&self) -> BTreeSet<CityPair> {
        let mut neighbors: BTreeMap<&City, Vec<&City>> = BTreeMap::new();
        for connection in &self.connections {
            let cities = connection.cities();
            neighbors
                .entry(cities.first())
                .or_default()
                .push(cities.second());
            neighbors
                .entry(cities.second())
                .or_default()
                .push(cities.first());
        }

        let mut cities_visited = BTreeSet::new();
        let mut destinations = BTreeSet::new();

        for start in &self.cities {
            if cities_visited.contains(start) {
                continue;
            }

            // Breadth-first search of the component containing `start`.
            let mut component = vec![start];
            let mut cities_to_visit = VecDeque::from([start]);
            cities_visited.insert(start);

            while let Some(city) = cities_to_visit.pop_front() {
                for neighbor in neighbors.get(city).into_iter().flatten() {
                    if cities_visited.insert(*neighbor) {
                        component.push(*neighbor);
                        cities_to_visit.push_back(*neighbor);
                    }
                }
            }

            for (i, a) in component.iter().enumerate() {
                for b in &component[i + 1..] {
                    if let Some(pair) = CityPair::new((*a).clone(), (*b).clone()) {
                        destinations.insert(pair);
                    }
                }
            }
        }

        destinations
    }
}
