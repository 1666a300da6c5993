use crate::board::{Board, RailConnection};
use crate::city::Destination;
use crate::color::RailColor;
use crate::view::ActiveView;

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// What a participant decided to do with its turn.
///
/// # JSON
/// Actions are serialized in snake_case, e.g. `"draw_cards"`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    /// Asks for more cards from the deck.
    DrawCards,
    /// Proposes to acquire the given connection.
    AcquireConnection(RailConnection),
}

/// Failure reported by a participant itself, e.g. a broken connection to a remote player.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParticipantError {
    #[error("Participant could not make a decision: {0}")]
    NoDecision(String),
    #[error("Participant answered with a malformed decision: {0}")]
    Malformed(String),
}

pub type ParticipantResult<T> = Result<T, ParticipantError>;

/// Capabilities the referee expects from anyone taking part in a game.
///
/// Implementations are not trusted: every call goes through
/// [`crate::boundary::IsolatedParticipant`], which survives panics, errors and calls that
/// never return.
pub trait Participant: Send {
    /// Start of the game: the board, how many pieces the participant gets, and its first cards.
    fn setup(&mut self, board: &Board, pieces: u32, cards: &[RailColor]) -> ParticipantResult<()>;

    /// Picks destinations among the offered ones.
    ///
    /// Returns the destinations the participant *declines*: everything else is kept.
    fn choose_destinations(
        &mut self,
        offered: &BTreeSet<Destination>,
    ) -> ParticipantResult<BTreeSet<Destination>>;

    fn take_turn(&mut self, view: &ActiveView) -> ParticipantResult<TurnAction>;

    /// Cards drawn from the deck after asking for them.
    fn receive_cards(&mut self, cards: &[RailColor]) -> ParticipantResult<()>;

    /// End of the game, for participants that were not removed.
    fn notify_outcome(&mut self, won: bool) -> ParticipantResult<()>;
}
