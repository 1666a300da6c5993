use crate::board::{Board, RailConnection};
use crate::boundary::{CallFailure, IsolatedParticipant};
use crate::city::Destination;
use crate::color::Hand;
use crate::config::{ConfigError, RefereeConfig, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::deck::{
    seeded_deck_supplier, seeded_destination_supplier, Deck, DeckSupplier, DestinationSupplier,
};
use crate::game_phase::GamePhase;
use crate::game_state::GameState;
use crate::participant::{Participant, TurnAction};
use crate::record::{ParticipantRecord, NUM_DESTINATIONS};
use crate::report::{GameEndReport, PlayerScore};

use log::{debug, info, warn};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;
use threadpool::ThreadPool;

/// Why a participant was removed from the game.
#[derive(Debug, Error, PartialEq)]
pub enum RemovalCause {
    #[error("{0}")]
    Call(#[from] CallFailure),
    #[error("Declined destinations {declined:?} out of {offered:?}.")]
    InvalidDestinations {
        offered: BTreeSet<String>,
        declined: BTreeSet<String>,
    },
    #[error("Illegal acquisition of {0}.")]
    IllegalAcquisition(RailConnection),
}

/// How a turn changed the game, which decides when it stalls.
#[derive(Debug, PartialEq)]
pub enum TurnOutcome {
    /// A connection was acquired.
    Significant,
    /// Cards were drawn, possibly none at all.
    Insignificant,
    /// The active participant was removed, which always changes the game.
    Removed(RemovalCause),
}

/// Collects everything needed to run a game, and checks it all at once in [`RefereeBuilder::build`].
pub struct RefereeBuilder {
    board: Board,
    participants: Vec<(String, Box<dyn Participant>)>,
    config: RefereeConfig,
    deck_supplier: Option<DeckSupplier>,
    destination_supplier: Option<DestinationSupplier>,
}

impl RefereeBuilder {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            participants: Vec::new(),
            config: RefereeConfig::default(),
            deck_supplier: None,
            destination_supplier: None,
        }
    }

    /// Adds a participant. Participants take turns in the order they were added.
    pub fn participant(mut self, name: impl Into<String>, participant: Box<dyn Participant>) -> Self {
        self.participants.push((name.into(), participant));
        self
    }

    pub fn config(mut self, config: RefereeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default random deck, seeded by [`RefereeConfig::seed`].
    pub fn deck_supplier(mut self, deck_supplier: DeckSupplier) -> Self {
        self.deck_supplier = Some(deck_supplier);
        self
    }

    /// Replaces the default destinations: every destination possible on the board, shuffled
    /// according to [`RefereeConfig::seed`].
    pub fn destination_supplier(mut self, destination_supplier: DestinationSupplier) -> Self {
        self.destination_supplier = Some(destination_supplier);
        self
    }

    /// Returns an `Err` if either:
    ///   * There are fewer than [`MIN_PARTICIPANTS`] or more than [`MAX_PARTICIPANTS`] participants.
    ///   * Two participants share the same name.
    ///   * The configuration is invalid (see [`RefereeConfig::validate`]).
    ///   * There are not enough distinct destinations to give every participant a full offer.
    ///
    /// Otherwise, returns a [`Referee`] ready to play. Both suppliers have been invoked by then.
    pub fn build(self) -> Result<Referee, ConfigError> {
        let num_participants = self.participants.len();
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&num_participants) {
            return Err(ConfigError::ParticipantCount(num_participants));
        }

        let mut names = HashSet::new();
        for (name, _) in &self.participants {
            if !names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateName(name.clone()));
            }
        }

        self.config.validate()?;

        let deck_supplier = self
            .deck_supplier
            .unwrap_or_else(|| seeded_deck_supplier(self.config.deck_size, self.config.seed));
        let destination_supplier = self
            .destination_supplier
            .unwrap_or_else(|| seeded_destination_supplier(self.config.seed));

        let deck = Deck::new(deck_supplier());

        // Duplicates are dropped, keeping the supplier's order.
        let mut seen = BTreeSet::new();
        let destinations: Vec<Destination> = destination_supplier(&self.board)
            .into_iter()
            .filter(|destination| seen.insert(destination.clone()))
            .collect();

        let required = self.config.required_destinations(num_participants);
        if destinations.len() < required {
            return Err(ConfigError::NotEnoughDestinations {
                required,
                available: destinations.len(),
            });
        }

        // Every participant may hang one worker for good before being removed.
        let pool = ThreadPool::with_name(String::from("participant"), num_participants + 1);
        let timeout = self.config.call_timeout();
        let participants = self
            .participants
            .into_iter()
            .map(|(name, participant)| {
                IsolatedParticipant::new(name, participant, pool.clone(), timeout)
            })
            .collect();

        Ok(Referee {
            phase: GamePhase::Setup,
            config: self.config,
            board: Arc::new(self.board),
            deck,
            destinations,
            participants,
            removed: BTreeSet::new(),
        })
    }
}

/// Runs one game from setup to the end, holding the only [`GameState`] of that game.
///
/// This acts as a finite-state machine over the [`GamePhase`]s.
pub struct Referee {
    phase: GamePhase,
    config: RefereeConfig,
    board: Arc<Board>,
    /// Undealt cards, until they are handed over to the game state.
    deck: Deck,
    /// Destinations that can still be offered, in order.
    destinations: Vec<Destination>,
    /// Participants still playing, in turn order.
    ///
    /// Once play starts, indices match the records of the game state.
    participants: Vec<IsolatedParticipant>,
    /// Names of the participants removed so far.
    removed: BTreeSet<String>,
}

impl Referee {
    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Plays the whole game and reports its outcome.
    ///
    /// Misbehaving participants are removed along the way, but never stop the game.
    pub fn play_game(mut self) -> GameEndReport {
        let state = self.set_up();

        self.next_phase();
        let state = self.play(state);

        self.next_phase();
        self.end(state)
    }

    fn next_phase(&mut self) {
        match self.phase.next() {
            Some(phase) => {
                info!("Game moves from {:?} to {:?}.", self.phase, phase);
                self.phase = phase;
            }
            None => unreachable!("No phase follows {:?}.", self.phase),
        }
    }

    fn set_up(&mut self) -> GameState {
        let mut records = Vec::new();
        let mut participants = Vec::new();

        for participant in std::mem::take(&mut self.participants) {
            match self.set_up_participant(&participant) {
                Ok((hand, destinations)) => {
                    info!(
                        "{} is set up with destinations {} and {}.",
                        participant.name(),
                        destinations[0],
                        destinations[1]
                    );

                    // The dealt cards were only peeked at so far.
                    self.deck.draw(self.config.starting_hand_size);
                    self.destinations
                        .retain(|destination| !destinations.contains(destination));

                    records.push(ParticipantRecord::new(
                        hand,
                        self.config.starting_pieces,
                        destinations,
                    ));
                    participants.push(participant);
                }
                Err(cause) => {
                    warn!("{} is removed during setup: {}", participant.name(), cause);
                    self.removed.insert(participant.name().to_owned());
                }
            }
        }

        self.participants = participants;
        GameState::new(
            Arc::clone(&self.board),
            std::mem::take(&mut self.deck),
            records,
        )
    }

    /// Deals and offers to one participant, without touching the deck nor the destinations.
    ///
    /// Returns the hand and destinations the participant ends up with, if it behaved.
    fn set_up_participant(
        &self,
        participant: &IsolatedParticipant,
    ) -> Result<(Hand, [Destination; NUM_DESTINATIONS]), RemovalCause> {
        let cards = self.deck.peek(self.config.starting_hand_size);
        participant.setup(
            Arc::clone(&self.board),
            self.config.starting_pieces,
            cards.to_vec(),
        )?;

        let offered: BTreeSet<Destination> = self
            .destinations
            .iter()
            .take(self.config.destinations_offered)
            .cloned()
            .collect();
        let declined = participant.choose_destinations(offered.clone())?;

        let invalid_destinations = || RemovalCause::InvalidDestinations {
            offered: offered.iter().map(ToString::to_string).collect(),
            declined: declined.iter().map(ToString::to_string).collect(),
        };

        if !declined.is_subset(&offered)
            || declined.len() != offered.len() - self.config.destinations_to_keep
        {
            return Err(invalid_destinations());
        }

        let kept = offered.difference(&declined).cloned();
        match array_init::from_iter(kept) {
            Some(destinations) => Ok((Hand::from_cards(&cards), destinations)),
            None => Err(invalid_destinations()),
        }
    }

    fn play(&mut self, mut state: GameState) -> GameState {
        let mut num_insignificant_turns = 0;

        while !self.is_game_over(&state, num_insignificant_turns) {
            match self.play_turn(&mut state) {
                TurnOutcome::Insignificant => num_insignificant_turns += 1,
                TurnOutcome::Significant | TurnOutcome::Removed(_) => num_insignificant_turns = 0,
            }
        }

        state
    }

    fn is_game_over(&self, state: &GameState, num_insignificant_turns: usize) -> bool {
        if state.is_empty() {
            info!("Game is over: no participant is left.");
            return true;
        }

        if num_insignificant_turns >= state.num_participants() {
            info!("Game is over: nobody acquired anything for a whole round.");
            return true;
        }

        let pieces = state.active_record().pieces();
        if pieces <= self.config.low_pieces_threshold {
            info!(
                "Game is over: {} only has {} pieces left.",
                self.participants[state.active_index()].name(),
                pieces
            );
            return true;
        }

        false
    }

    /// Plays the active participant's turn, then hands the turn over to the next participant.
    pub(crate) fn play_turn(&mut self, state: &mut GameState) -> TurnOutcome {
        let active = state.active_index();
        let participant = &self.participants[active];

        let outcome = match participant.take_turn(state.active_participant_view()) {
            Ok(TurnAction::DrawCards) => {
                let cards = match state.draw_cards(self.config.cards_per_draw) {
                    Ok(cards) => cards,
                    Err(error) => unreachable!("Validated draw size was rejected: {}", error),
                };
                debug!("{} draws {:?}.", participant.name(), cards.as_slice());

                match participant.receive_cards(cards.to_vec()) {
                    Ok(()) => TurnOutcome::Insignificant,
                    Err(failure) => TurnOutcome::Removed(failure.into()),
                }
            }
            Ok(TurnAction::AcquireConnection(connection)) => {
                if state.acquire_connection_for_active_participant(&connection) {
                    debug!("{} acquires {}.", participant.name(), connection);
                    TurnOutcome::Significant
                } else {
                    TurnOutcome::Removed(RemovalCause::IllegalAcquisition(connection))
                }
            }
            Err(failure) => TurnOutcome::Removed(failure.into()),
        };

        match &outcome {
            TurnOutcome::Removed(cause) => {
                warn!("{} is removed: {}", participant.name(), cause);

                // Removal already makes the next participant active.
                let record = state.remove_active_participant();
                debug!(
                    "{} forfeits {} cards and {} connections.",
                    participant.name(),
                    record.hand().total(),
                    record.owned_connections().len()
                );

                let participant = self.participants.remove(active);
                self.removed.insert(participant.name().to_owned());
            }
            _ => state.advance_turn(),
        }

        outcome
    }

    fn end(&mut self, state: GameState) -> GameEndReport {
        let scores = state
            .score_all_participants()
            .into_iter()
            .zip(&self.participants)
            .map(|(score, participant)| PlayerScore::new(participant.name(), score))
            .collect();

        let mut report = GameEndReport::new(scores, std::mem::take(&mut self.removed));
        let winners: HashSet<String> = report.winners().into_iter().map(String::from).collect();

        for participant in std::mem::take(&mut self.participants) {
            let won = winners.contains(participant.name());
            if let Err(failure) = participant.notify_outcome(won) {
                warn!(
                    "{} is removed after failing to hear the outcome: {}",
                    participant.name(),
                    failure
                );
                report.remove(participant.name());
            }
        }

        info!(
            "Game ended with winners {:?} and removed participants {:?}.",
            report.winners(),
            report.removed()
        );
        report
    }
}
