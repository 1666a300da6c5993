use crate::board::{Board, RailConnection};
use crate::checker::can_acquire;
use crate::deck::{Deck, DrawnCards};
use crate::record::ParticipantRecord;
use crate::scoring::score_all;
use crate::view::{ActiveView, OpponentInfo};

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GameStateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Authoritative state of a game in progress.
///
/// Holds one record per participant still playing, in turn order, and which of them is active.
/// Only the referee mutates it, one turn at a time.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Arc<Board>,
    deck: Deck,
    records: Vec<ParticipantRecord>,
    /// Index in `records` of the active participant.
    ///
    /// Always in bounds, unless no records are left.
    active: usize,
}

impl GameState {
    /// Creates a game state where the first record is the active participant.
    pub fn new(board: Arc<Board>, deck: Deck, records: Vec<ParticipantRecord>) -> Self {
        Self {
            board,
            deck,
            records,
            active: 0,
        }
    }

    /// Draws up to `count` cards from the deck into the active participant's hand.
    ///
    /// Returns the cards that were drawn, in order: fewer than `count` when the deck runs short,
    /// and none at all when it is empty.
    ///
    /// Returns an `Err` if `count` is zero, or if no participant is left.
    pub fn draw_cards(&mut self, count: usize) -> Result<DrawnCards, GameStateError> {
        if count == 0 {
            return Err(GameStateError::InvalidArgument(String::from(
                "Cannot draw zero cards.",
            )));
        }
        if self.records.is_empty() {
            return Err(GameStateError::InvalidArgument(String::from(
                "Cannot draw cards when no participant is left.",
            )));
        }

        let cards = self.deck.draw(count);
        self.active_record_mut().receive_cards(&cards);
        Ok(cards)
    }

    /// Acquires the connection for the active participant, if that is legal in the current state.
    ///
    /// On success, the participant pays as many cards of the connection's color and as many
    /// pieces as its length. Returns whether the acquisition happened: nothing changes otherwise.
    pub fn acquire_connection_for_active_participant(
        &mut self,
        connection: &RailConnection,
    ) -> bool {
        if self.records.is_empty()
            || !can_acquire(&self.active_participant_view(), &self.board, connection)
        {
            return false;
        }

        // The board's own connection is stored, never the proposal itself.
        let connection = match self.board.connection(connection) {
            Some(connection) => connection.clone(),
            None => unreachable!("Approved acquisition of {} which is not on the board.", connection),
        };
        self.active_record_mut().acquire(connection);
        true
    }

    /// Makes the next participant in turn order active, wrapping around.
    pub fn advance_turn(&mut self) {
        if !self.records.is_empty() {
            self.active = (self.active + 1) % self.records.len();
        }
    }

    /// Removes the active participant for good, forfeiting everything it held.
    ///
    /// The participant that came after it becomes active. Its connections are not handed to
    /// anyone, and can be acquired again by the others.
    ///
    /// # Panics
    /// If no participant is left.
    pub fn remove_active_participant(&mut self) -> ParticipantRecord {
        let removed = self.records.remove(self.active);

        if self.active >= self.records.len() {
            self.active = 0;
        }
        removed
    }

    /// What the active participant gets to see when taking its turn.
    ///
    /// # Panics
    /// If no participant is left.
    pub fn active_participant_view(&self) -> ActiveView {
        let num_participants = self.records.len();
        let opponents = (1..num_participants)
            .map(|offset| &self.records[(self.active + offset) % num_participants])
            .map(|record| OpponentInfo::new(record.owned_connections().clone()))
            .collect();

        ActiveView::new(self.active_record().clone(), opponents)
    }

    /// Scores of all participants still playing, in turn order.
    pub fn score_all_participants(&self) -> Vec<i32> {
        score_all(&self.records)
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn num_participants(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// # Panics
    /// If no participant is left.
    #[inline]
    pub fn active_record(&self) -> &ParticipantRecord {
        &self.records[self.active]
    }

    #[inline]
    fn active_record_mut(&mut self) -> &mut ParticipantRecord {
        &mut self.records[self.active]
    }

    #[inline]
    pub fn records(&self) -> &[ParticipantRecord] {
        &self.records
    }

    #[inline]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Union of the connections owned by every participant still playing.
    pub fn all_owned_connections(&self) -> BTreeSet<&RailConnection> {
        self.records
            .iter()
            .flat_map(|record| record.owned_connections())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Hand, RailColor, RailColor::*};
    use crate::test_utils::{connection, destinations, three_city_board};

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn record(cards: &[RailColor]) -> ParticipantRecord {
        ParticipantRecord::new(Hand::from_cards(cards), 45, destinations())
    }

    fn game_state(deck: &[RailColor], hands: &[&[RailColor]]) -> GameState {
        GameState::new(
            Arc::new(three_city_board()),
            Deck::new(deck.iter().copied()),
            hands.iter().map(|cards| record(cards)).collect(),
        )
    }

    fn total_cards(state: &GameState) -> usize {
        state.deck_len()
            + state
                .records()
                .iter()
                .map(|record| record.hand().total() as usize)
                .sum::<usize>()
    }

    // Tests for `GameState::draw_cards`.

    #[test]
    fn draw_cards_into_active_hand() {
        let mut state = game_state(&[Red, Blue, White], &[&[], &[]]);

        assert_eq!(state.draw_cards(2).unwrap().as_slice(), &[Red, Blue]);
        assert_eq!(state.active_record().hand().count(Red), 1);
        assert_eq!(state.active_record().hand().count(Blue), 1);
        assert_eq!(state.records()[1].hand().total(), 0);
        assert_eq!(state.deck_len(), 1);
    }

    #[test]
    fn draw_cards_short_deck() {
        let mut state = game_state(&[Green], &[&[], &[]]);

        assert_eq!(state.draw_cards(2).unwrap().as_slice(), &[Green]);
        assert!(state.draw_cards(2).unwrap().is_empty());
        assert_eq!(state.active_record().hand().total(), 1);
    }

    #[test]
    fn draw_zero_cards() {
        let mut state = game_state(&[Green], &[&[], &[]]);

        assert!(matches!(
            state.draw_cards(0),
            Err(GameStateError::InvalidArgument(_))
        ));
        assert_eq!(state.deck_len(), 1);
    }

    #[test]
    fn draw_cards_without_participants() {
        let mut state = game_state(&[Green], &[&[]]);
        state.remove_active_participant();

        assert!(matches!(
            state.draw_cards(1),
            Err(GameStateError::InvalidArgument(_))
        ));
        assert_eq!(state.deck_len(), 1);
    }

    // Tests for `GameState::acquire_connection_for_active_participant`.

    #[test]
    fn acquire_legal_connection() {
        let mut state = game_state(&[], &[&[Blue, Blue, Blue, Blue], &[]]);
        let ab = connection("A", "B", 3, Blue);

        assert!(state.acquire_connection_for_active_participant(&ab));

        let record = state.active_record();
        assert_eq!(record.hand().count(Blue), 1);
        assert_eq!(record.pieces(), 42);
        assert_eq!(record.owned_connections(), &BTreeSet::from([ab]));
    }

    #[test]
    fn acquire_illegal_connection_changes_nothing() {
        let mut state = game_state(&[], &[&[Blue, Blue], &[]]);
        let before = state.active_record().clone();

        assert!(!state.acquire_connection_for_active_participant(&connection("A", "B", 3, Blue)));
        assert!(!state.acquire_connection_for_active_participant(&connection("A", "C", 3, Blue)));
        assert_eq!(state.active_record(), &before);
    }

    #[test]
    fn acquire_connection_owned_by_opponent() {
        let mut state = game_state(&[], &[&[Blue; 3], &[Blue; 3]]);
        let ab = connection("A", "B", 3, Blue);

        assert!(state.acquire_connection_for_active_participant(&ab));
        state.advance_turn();
        assert!(!state.acquire_connection_for_active_participant(&ab));
        assert_eq!(state.all_owned_connections(), BTreeSet::from([&ab]));
    }

    // Tests for turn order.

    #[test]
    fn advance_turn_wraps_around() {
        let mut state = game_state(&[], &[&[], &[], &[]]);

        let order: Vec<usize> = (0..4)
            .map(|_| {
                state.advance_turn();
                state.active_index()
            })
            .collect();
        assert_eq!(order, vec![1, 2, 0, 1]);
    }

    #[test]
    fn remove_last_in_order_wraps_to_first() {
        let mut state = game_state(&[], &[&[Red], &[Blue], &[White]]);
        state.advance_turn();
        state.advance_turn();

        let removed = state.remove_active_participant();

        assert_eq!(removed.hand().count(White), 1);
        assert_eq!(state.num_participants(), 2);
        assert_eq!(state.active_index(), 0);
        assert_eq!(state.active_record().hand().count(Red), 1);
    }

    #[test]
    fn remove_until_empty() {
        let mut state = game_state(&[], &[&[], &[]]);

        state.remove_active_participant();
        assert_eq!(state.active_index(), 0);
        state.remove_active_participant();
        assert!(state.is_empty());

        state.advance_turn();
        assert_eq!(state.active_index(), 0);
    }

    #[test]
    fn removed_connections_become_available() {
        let mut state = game_state(&[], &[&[Blue; 3], &[Blue; 3]]);
        let ab = connection("A", "B", 3, Blue);

        assert!(state.acquire_connection_for_active_participant(&ab));
        state.remove_active_participant();

        assert!(state.all_owned_connections().is_empty());
        assert!(state.acquire_connection_for_active_participant(&ab));
    }

    // Tests for `GameState::active_participant_view`.

    #[test]
    fn view_lists_opponents_after_active() {
        let mut state = game_state(&[], &[&[Blue; 3], &[Red; 4], &[]]);
        let ab = connection("A", "B", 3, Blue);
        let bc = connection("B", "C", 4, Red);

        assert!(state.acquire_connection_for_active_participant(&ab));
        state.advance_turn();
        assert!(state.acquire_connection_for_active_participant(&bc));
        state.advance_turn();

        let view = state.active_participant_view();
        assert_eq!(view.pieces(), 45);
        assert_eq!(
            view.opponents(),
            &[
                OpponentInfo::new(BTreeSet::from([ab])),
                OpponentInfo::new(BTreeSet::from([bc])),
            ]
        );
    }

    #[test]
    fn score_all_participants_in_turn_order() {
        let mut state = game_state(&[], &[&[], &[Blue; 3]]);
        state.advance_turn();
        assert!(state.acquire_connection_for_active_participant(&connection("A", "B", 3, Blue)));

        // The second participant connects A-B but not A-C, and has the longest path.
        assert_eq!(state.score_all_participants(), vec![-20, 3 + 20]);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Draw(usize),
        Acquire(u8, RailColor),
        Advance,
        Remove,
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            (1usize..4).prop_map(Operation::Draw),
            (3u8..=4, prop_oneof![Just(Blue), Just(Red)])
                .prop_map(|(length, color)| Operation::Acquire(length, color)),
            Just(Operation::Advance),
            Just(Operation::Remove),
        ]
    }

    proptest! {
        #[test]
        fn state_invariants_hold(
            num_participants in 1usize..6,
            operations in prop::collection::vec(operation(), 0..40),
        ) {
            let deck: Vec<RailColor> = [Blue, Red, White, Blue, Red, Red, Blue, Green]
                .iter()
                .copied()
                .cycle()
                .take(30)
                .collect();
            let hands = vec![&[][..]; num_participants];
            let mut state = game_state(&deck, &hands);
            let mut cards = total_cards(&state);
            let mut deck_len = state.deck_len();

            for operation in operations {
                if state.is_empty() {
                    break;
                }

                match operation {
                    Operation::Draw(count) => {
                        state.draw_cards(count).unwrap();
                    }
                    Operation::Acquire(length, color) => {
                        let (a, b) = if color == Blue { ("A", "B") } else { ("B", "C") };
                        state.acquire_connection_for_active_participant(&connection(a, b, length, color));
                    }
                    Operation::Advance => state.advance_turn(),
                    Operation::Remove => {
                        let num_before = state.num_participants();
                        let active_before = state.active_index();
                        state.remove_active_participant();

                        prop_assert_eq!(state.num_participants(), num_before - 1);
                        if !state.is_empty() {
                            prop_assert_eq!(state.active_index(), active_before % state.num_participants());
                        }
                    }
                }

                // The deck only shrinks, and cards never appear out of thin air.
                prop_assert!(state.deck_len() <= deck_len);
                prop_assert!(total_cards(&state) <= cards);
                deck_len = state.deck_len();
                cards = total_cards(&state);

                // Nobody shares a connection.
                let owned: usize = state.records().iter().map(|record| record.owned_connections().len()).sum();
                prop_assert_eq!(owned, state.all_owned_connections().len());

                if !state.is_empty() {
                    prop_assert!(state.active_index() < state.num_participants());
                }
            }
        }
    }
}
