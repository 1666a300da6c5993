use crate::board::RailConnection;
use crate::city::Destination;
use crate::color::{Hand, RailColor};

use serde::Serialize;
use std::collections::BTreeSet;

/// Every participant keeps exactly this many destinations for the whole game.
pub const NUM_DESTINATIONS: usize = 2;

/// Everything the referee tracks about a participant that is still playing.
///
/// Only the [`crate::game_state::GameState`] holds records; a record disappears for good when its
/// participant is removed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticipantRecord {
    /// Cards in hand, per color.
    hand: Hand,
    /// Pieces left to place on the board.
    pieces: u32,
    /// The destinations this participant kept during setup.
    destinations: [Destination; NUM_DESTINATIONS],
    /// Connections acquired so far.
    owned_connections: BTreeSet<RailConnection>,
}

impl ParticipantRecord {
    /// A fresh record, as created at the end of a successful setup.
    pub fn new(hand: Hand, pieces: u32, destinations: [Destination; NUM_DESTINATIONS]) -> Self {
        Self {
            hand,
            pieces,
            destinations,
            owned_connections: BTreeSet::new(),
        }
    }

    /// Builder-style helper to start from already owned connections.
    pub fn with_owned_connections(
        mut self,
        owned_connections: impl IntoIterator<Item = RailConnection>,
    ) -> Self {
        self.owned_connections.extend(owned_connections);
        self
    }

    #[inline]
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    #[inline]
    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    #[inline]
    pub fn destinations(&self) -> &[Destination; NUM_DESTINATIONS] {
        &self.destinations
    }

    #[inline]
    pub fn owned_connections(&self) -> &BTreeSet<RailConnection> {
        &self.owned_connections
    }

    pub(crate) fn receive_cards(&mut self, cards: &[RailColor]) {
        for card in cards {
            self.hand.add(*card, 1);
        }
    }

    /// Pays for, then takes ownership of, the given connection.
    ///
    /// Callers must have verified that the record can afford it: paying with missing cards or
    /// pieces means the legality check and the state disagree, which is a bug.
    pub(crate) fn acquire(&mut self, connection: RailConnection) {
        let length = connection.length().value();

        let pieces = match self.pieces.checked_sub(length) {
            Some(pieces) => pieces,
            None => panic!(
                "Approved acquisition of {} with only {} pieces left.",
                connection, self.pieces
            ),
        };

        if self.hand.remove(connection.color(), length).is_none() {
            panic!(
                "Approved acquisition of {} with only {} {} cards in hand.",
                connection,
                self.hand.count(connection.color()),
                connection.color()
            );
        }

        self.pieces = pieces;
        self.owned_connections.insert(connection);
    }
}
