use crate::board::{Board, RailConnection};
use crate::city::Destination;
use crate::color::Hand;
use crate::record::{ParticipantRecord, NUM_DESTINATIONS};

use serde::Serialize;
use std::collections::BTreeSet;

/// What the active participant may know about one of its opponents: only the connections they own.
///
/// Hands, pieces and destinations of opponents stay hidden.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpponentInfo {
    owned_connections: BTreeSet<RailConnection>,
}

impl OpponentInfo {
    pub fn new(owned_connections: BTreeSet<RailConnection>) -> Self {
        Self { owned_connections }
    }

    #[inline]
    pub fn owned_connections(&self) -> &BTreeSet<RailConnection> {
        &self.owned_connections
    }
}

/// Snapshot of the game from the perspective of the active participant.
///
/// It is handed to that participant when asking for its turn, and is what the legality check
/// runs against. It holds the participant's own private state in full, and only
/// [`OpponentInfo`] about everyone else, in turn order starting after the active participant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveView {
    own: ParticipantRecord,
    opponents: Vec<OpponentInfo>,
}

impl ActiveView {
    pub fn new(own: ParticipantRecord, opponents: Vec<OpponentInfo>) -> Self {
        Self { own, opponents }
    }

    #[inline]
    pub fn hand(&self) -> &Hand {
        self.own.hand()
    }

    #[inline]
    pub fn pieces(&self) -> u32 {
        self.own.pieces()
    }

    #[inline]
    pub fn destinations(&self) -> &[Destination; NUM_DESTINATIONS] {
        self.own.destinations()
    }

    #[inline]
    pub fn owned_connections(&self) -> &BTreeSet<RailConnection> {
        self.own.owned_connections()
    }

    #[inline]
    pub fn opponents(&self) -> &[OpponentInfo] {
        &self.opponents
    }

    /// Whether anyone visible from this view, the active participant included, owns the connection.
    pub fn is_owned(&self, connection: &RailConnection) -> bool {
        self.owned_connections().contains(connection)
            || self
                .opponents
                .iter()
                .any(|opponent| opponent.owned_connections().contains(connection))
    }

    /// Connections of the board that nobody owns.
    pub fn unoccupied_connections<'a>(
        &'a self,
        board: &'a Board,
    ) -> impl Iterator<Item = &'a RailConnection> + 'a {
        board
            .connections()
            .iter()
            .filter(move |connection| !self.is_owned(connection))
    }
}
