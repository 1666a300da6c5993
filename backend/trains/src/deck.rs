use crate::board::Board;
use crate::city::Destination;
use crate::color::RailColor;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use std::collections::VecDeque;
use strum::IntoEnumIterator;

/// Cards drawn in one go. Draws are small, so they stay on the stack.
pub type DrawnCards = SmallVec<[RailColor; 4]>;

/// Produces the deck of a game, in draw order.
pub type DeckSupplier = Box<dyn FnOnce() -> Vec<RailColor>>;

/// Produces the ordered pool of destinations offered to participants, for the given board.
pub type DestinationSupplier = Box<dyn FnOnce(&Board) -> Vec<Destination>>;

/// The undealt rail cards of a game.
///
/// Cards are drawn from the front, and never put back: the deck only ever shrinks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deck {
    cards: VecDeque<RailColor>,
}

impl Deck {
    pub fn new(cards: impl IntoIterator<Item = RailColor>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// A deck of `size` cards, each of a color picked uniformly at random.
    pub fn random<R: Rng>(size: usize, rng: &mut R) -> Self {
        let colors: Vec<RailColor> = RailColor::iter().collect();

        Self::new((0..size).filter_map(|_| colors.choose(&mut *rng).copied()))
    }

    /// Draws up to `count` cards from the front of the deck, in draw order.
    ///
    /// Fewer cards are returned if the deck runs out; drawing from an empty deck returns nothing.
    ///
    /// # Example
    /// ```
    /// use trains::color::RailColor;
    /// use trains::deck::Deck;
    ///
    /// let mut deck = Deck::new([RailColor::Red, RailColor::Blue, RailColor::Green]);
    ///
    /// assert_eq!(deck.draw(2).as_slice(), &[RailColor::Red, RailColor::Blue]);
    /// assert_eq!(deck.draw(2).as_slice(), &[RailColor::Green]);
    /// assert!(deck.draw(2).is_empty());
    /// ```
    pub fn draw(&mut self, count: usize) -> DrawnCards {
        let count = count.min(self.cards.len());
        self.cards.drain(..count).collect()
    }

    /// The next `count` cards (fewer if the deck is short), without drawing them.
    pub fn peek(&self, count: usize) -> DrawnCards {
        self.cards.iter().take(count).copied().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// A supplier of `size` random cards, reproducible through `seed`.
pub fn seeded_deck_supplier(size: usize, seed: u64) -> DeckSupplier {
    Box::new(move || {
        let mut rng = StdRng::seed_from_u64(seed);
        Deck::random(size, &mut rng).cards.into_iter().collect()
    })
}

/// A supplier of every destination possible on the board, shuffled reproducibly through `seed`.
pub fn seeded_destination_supplier(seed: u64) -> DestinationSupplier {
    Box::new(move |board: &Board| {
        let mut destinations: Vec<Destination> = board
            .all_possible_destinations()
            .into_iter()
            .map(Destination::new)
            .collect();

        destinations.shuffle(&mut StdRng::seed_from_u64(seed));
        destinations
    })
}

/// A supplier that hands out exactly the given cards, in order.
pub fn fixed_deck_supplier(cards: Vec<RailColor>) -> DeckSupplier {
    Box::new(move || cards)
}

/// A supplier that hands out exactly the given destinations, in order, whatever the board.
pub fn fixed_destination_supplier(destinations: Vec<Destination>) -> DestinationSupplier {
    Box::new(move |_: &Board| destinations)
}
