use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A city on the board.
///
/// Its name is unique within a board: equality, ordering and hashing only look at the name.
/// The position is for display purposes only.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct City {
    name: String,
    x: u32,
    y: u32,
}

impl City {
    pub fn new(name: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for City {}

impl Hash for City {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for City {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for City {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Unordered pair of two distinct cities.
///
/// The pair is normalized on construction, so that the city whose name comes first
/// lexicographically is always [`CityPair::first`]. Two pairs holding the same cities
/// are thus equal regardless of the order they were given in.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CityPair {
    first: City,
    second: City,
}

impl CityPair {
    /// Returns `None` if both cities are the same.
    ///
    /// # Example
    /// ```
    /// use trains::city::{City, CityPair};
    ///
    /// let boston = City::new("Boston", 0, 0);
    /// let austin = City::new("Austin", 5, 5);
    ///
    /// let pair = CityPair::new(boston.clone(), austin.clone()).unwrap();
    /// assert_eq!(pair.first(), &austin);
    /// assert_eq!(pair, CityPair::new(austin, boston.clone()).unwrap());
    ///
    /// assert!(CityPair::new(boston.clone(), boston).is_none());
    /// ```
    pub fn new(a: City, b: City) -> Option<Self> {
        match a.cmp(&b) {
            Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn first(&self) -> &City {
        &self.first
    }

    #[inline]
    pub fn second(&self) -> &City {
        &self.second
    }

    #[inline]
    pub fn contains(&self, city: &City) -> bool {
        &self.first == city || &self.second == city
    }
}

impl fmt::Display for CityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// A pair of cities a participant secretly tries to connect.
///
/// Connected destinations are worth a bonus at the end of the game, disconnected ones a penalty.
/// Ordered lexicographically by city names.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Destination(CityPair);

impl Destination {
    #[inline]
    pub fn new(cities: CityPair) -> Self {
        Self(cities)
    }

    #[inline]
    pub fn cities(&self) -> &CityPair {
        &self.0
    }
}

impl From<CityPair> for Destination {
    fn from(cities: CityPair) -> Self {
        Self(cities)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
