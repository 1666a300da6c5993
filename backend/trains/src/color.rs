use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter};

/// The colors a rail connection, and therefore a rail card, can have.
///
/// # JSON
/// Colors are serialized in lowercase.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RailColor {
    Red,
    Blue,
    Green,
    White,
}

/// Maps how many cards of each color a participant holds.
///
/// It is guaranteed that the map has at all times an entry for every [`RailColor`],
/// even when that count is zero.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "BTreeMap<RailColor, u32>")]
pub struct Hand(BTreeMap<RailColor, u32>);

impl Hand {
    /// An empty hand, with a zero count for every color.
    pub fn new() -> Self {
        Self(RailColor::iter().map(|color| (color, 0)).collect())
    }

    /// Builds a hand holding exactly the given cards.
    ///
    /// # Example
    /// ```
    /// use trains::color::{Hand, RailColor};
    ///
    /// let hand = Hand::from_cards(&[RailColor::Red, RailColor::Red, RailColor::Blue]);
    /// assert_eq!(hand.count(RailColor::Red), 2);
    /// assert_eq!(hand.count(RailColor::Green), 0);
    /// assert_eq!(hand.total(), 3);
    /// ```
    pub fn from_cards(cards: &[RailColor]) -> Self {
        let mut hand = Self::new();
        for card in cards {
            hand.add(*card, 1);
        }
        hand
    }

    #[inline]
    pub fn count(&self, color: RailColor) -> u32 {
        self.0.get(&color).copied().unwrap_or(0)
    }

    #[inline]
    pub fn add(&mut self, color: RailColor, num: u32) {
        *self.0.entry(color).or_insert(0) += num;
    }

    /// Removes `num` cards of `color`.
    ///
    /// Returns `None`, and leaves the hand untouched, if there are fewer than `num` of them.
    pub fn remove(&mut self, color: RailColor, num: u32) -> Option<u32> {
        let count = self.0.entry(color).or_insert(0);
        *count = count.checked_sub(num)?;
        Some(*count)
    }

    /// Total number of cards, across all colors.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RailColor, u32)> + '_ {
        self.0.iter().map(|(color, count)| (*color, *count))
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BTreeMap<RailColor, u32>> for Hand {
    fn from(counts: BTreeMap<RailColor, u32>) -> Self {
        let mut hand = Self::new();
        for (color, count) in counts {
            hand.add(color, count);
        }
        hand
    }
}
