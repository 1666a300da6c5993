//! Reference decision-making for participants running in the same process as the referee.

use crate::board::{Board, RailConnection, SegmentLength};
use crate::checker::acquirable_connections;
use crate::city::Destination;
use crate::color::RailColor;
use crate::participant::{Participant, ParticipantError, ParticipantResult, TurnAction};
use crate::record::NUM_DESTINATIONS;
use crate::view::ActiveView;

use std::collections::BTreeSet;

/// Pure decisions a participant makes, given everything it is allowed to know.
pub trait Strategy: Send {
    /// Returns the destinations to decline out of the offered ones.
    fn decline_destinations(&mut self, offered: &BTreeSet<Destination>) -> BTreeSet<Destination>;

    fn take_turn(&mut self, view: &ActiveView, board: &Board) -> TurnAction;
}

/// Destinations left once the first `NUM_DESTINATIONS` are kept.
fn decline_all_but_first(offered: &BTreeSet<Destination>) -> BTreeSet<Destination> {
    offered.iter().skip(NUM_DESTINATIONS).cloned().collect()
}

/// Destinations left once the last `NUM_DESTINATIONS` are kept.
fn decline_all_but_last(offered: &BTreeSet<Destination>) -> BTreeSet<Destination> {
    let num_declined = offered.len().saturating_sub(NUM_DESTINATIONS);
    offered.iter().take(num_declined).cloned().collect()
}

/// The lexicographically first connection the active participant may acquire.
fn first_acquirable(view: &ActiveView, board: &Board) -> Option<RailConnection> {
    acquirable_connections(view, board)
        .min_by(|a, b| a.lexicographic_cmp(b))
        .cloned()
}

/// Acquires whatever it can, as soon as it can.
///
/// Keeps the lexicographically last destinations, and only draws when nothing can be acquired.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuyNow;

impl Strategy for BuyNow {
    fn decline_destinations(&mut self, offered: &BTreeSet<Destination>) -> BTreeSet<Destination> {
        decline_all_but_last(offered)
    }

    fn take_turn(&mut self, view: &ActiveView, board: &Board) -> TurnAction {
        match first_acquirable(view, board) {
            Some(connection) => TurnAction::AcquireConnection(connection),
            None => TurnAction::DrawCards,
        }
    }
}

/// Hoards cards until holding more than 10 of them, then acquires like [`BuyNow`].
///
/// Keeps the lexicographically first destinations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hold10;

impl Hold10 {
    pub const MAX_CARDS_BEFORE_ACQUIRING: u32 = 10;
}

impl Strategy for Hold10 {
    fn decline_destinations(&mut self, offered: &BTreeSet<Destination>) -> BTreeSet<Destination> {
        decline_all_but_first(offered)
    }

    fn take_turn(&mut self, view: &ActiveView, board: &Board) -> TurnAction {
        if view.hand().total() <= Self::MAX_CARDS_BEFORE_ACQUIRING {
            return TurnAction::DrawCards;
        }

        match first_acquirable(view, board) {
            Some(connection) => TurnAction::AcquireConnection(connection),
            None => TurnAction::DrawCards,
        }
    }
}

/// Tries to acquire a connection that does not exist: one of the board's, with a length it does
/// not have. Gets removed on its first turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cheat;

impl Strategy for Cheat {
    fn decline_destinations(&mut self, offered: &BTreeSet<Destination>) -> BTreeSet<Destination> {
        decline_all_but_first(offered)
    }

    fn take_turn(&mut self, _: &ActiveView, board: &Board) -> TurnAction {
        let genuine = match board
            .connections()
            .iter()
            .min_by(|a, b| a.lexicographic_cmp(b))
        {
            Some(connection) => connection,
            None => return TurnAction::DrawCards,
        };

        let fabricated_length = match genuine.length() {
            SegmentLength::Five => SegmentLength::Three,
            _ => SegmentLength::Five,
        };

        TurnAction::AcquireConnection(RailConnection::new(
            genuine.cities().clone(),
            fabricated_length,
            genuine.color(),
        ))
    }
}

/// A [`Participant`] making its decisions through a [`Strategy`].
///
/// It remembers the board it was set up with, and otherwise only relies on what the referee
/// tells it.
#[derive(Debug, Default)]
pub struct StrategyParticipant<S> {
    strategy: S,
    board: Option<Board>,
    won: Option<bool>,
}

impl<S: Strategy> StrategyParticipant<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            board: None,
            won: None,
        }
    }

    /// Whether the game was won, once it is over.
    #[inline]
    pub fn won(&self) -> Option<bool> {
        self.won
    }
}

impl<S: Strategy> Participant for StrategyParticipant<S> {
    fn setup(&mut self, board: &Board, _: u32, _: &[RailColor]) -> ParticipantResult<()> {
        self.board = Some(board.clone());
        Ok(())
    }

    fn choose_destinations(
        &mut self,
        offered: &BTreeSet<Destination>,
    ) -> ParticipantResult<BTreeSet<Destination>> {
        Ok(self.strategy.decline_destinations(offered))
    }

    fn take_turn(&mut self, view: &ActiveView) -> ParticipantResult<TurnAction> {
        match &self.board {
            Some(board) => Ok(self.strategy.take_turn(view, board)),
            None => Err(ParticipantError::NoDecision(String::from(
                "Cannot take a turn before being set up.",
            ))),
        }
    }

    fn receive_cards(&mut self, _: &[RailColor]) -> ParticipantResult<()> {
        Ok(())
    }

    fn notify_outcome(&mut self, won: bool) -> ParticipantResult<()> {
        self.won = Some(won);
        Ok(())
    }
}
