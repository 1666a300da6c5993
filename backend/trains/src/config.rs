use crate::record::NUM_DESTINATIONS;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 8;

pub const DEFAULT_STARTING_PIECES: u32 = 45;
pub const DEFAULT_STARTING_HAND_SIZE: usize = 4;
pub const DEFAULT_DESTINATIONS_OFFERED: usize = 5;
pub const DEFAULT_CARDS_PER_DRAW: usize = 2;
pub const DEFAULT_LOW_PIECES_THRESHOLD: u32 = 2;
pub const DEFAULT_DECK_SIZE: usize = 250;
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 2000;

/// Why a game cannot be started.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "A game needs between {min} and {max} participants, but {0} were given.",
        min = MIN_PARTICIPANTS,
        max = MAX_PARTICIPANTS
    )]
    ParticipantCount(usize),
    #[error("Participant name `{0}` is used more than once.")]
    DuplicateName(String),
    #[error(
        "Every participant must keep exactly {keep} destinations, out of at least as many offered.",
        keep = NUM_DESTINATIONS
    )]
    DestinationsToKeep,
    #[error("Cards must be drawn at least one at a time.")]
    ZeroCardsPerDraw,
    #[error("The call timeout must be positive.")]
    ZeroTimeout,
    #[error("{required} destinations are needed for this game, but the board only offers {available}.")]
    NotEnoughDestinations { required: usize, available: usize },
}

/// Parameters of a game, all with defaults following the standard rules.
///
/// # JSON
/// Every field is optional: missing ones take their default value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RefereeConfig {
    /// Pieces every participant starts with.
    pub starting_pieces: u32,
    /// Cards dealt to every participant at setup.
    pub starting_hand_size: usize,
    /// Destinations offered to every participant at setup.
    pub destinations_offered: usize,
    /// Destinations every participant keeps out of the offered ones.
    pub destinations_to_keep: usize,
    pub cards_per_draw: usize,
    /// The game ends once the active participant has this many pieces or fewer.
    pub low_pieces_threshold: u32,
    /// Size of the default random deck.
    pub deck_size: usize,
    /// How long each call into a participant may take.
    pub call_timeout_ms: u64,
    /// Seed of the default deck and destination suppliers.
    pub seed: u64,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            starting_pieces: DEFAULT_STARTING_PIECES,
            starting_hand_size: DEFAULT_STARTING_HAND_SIZE,
            destinations_offered: DEFAULT_DESTINATIONS_OFFERED,
            destinations_to_keep: NUM_DESTINATIONS,
            cards_per_draw: DEFAULT_CARDS_PER_DRAW,
            low_pieces_threshold: DEFAULT_LOW_PIECES_THRESHOLD,
            deck_size: DEFAULT_DECK_SIZE,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            seed: 0,
        }
    }
}

impl RefereeConfig {
    /// Checks the parameters that do not depend on the participants or the board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destinations_to_keep != NUM_DESTINATIONS
            || self.destinations_offered < self.destinations_to_keep
        {
            return Err(ConfigError::DestinationsToKeep);
        }

        if self.cards_per_draw == 0 {
            return Err(ConfigError::ZeroCardsPerDraw);
        }

        if self.call_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// How many destinations must be available so that every participant gets a full offer.
    ///
    /// Each participant before the last one permanently takes the destinations it keeps out of
    /// the pool, and the last one still needs a complete offer.
    pub fn required_destinations(&self, num_participants: usize) -> usize {
        num_participants * self.destinations_to_keep
            + (self.destinations_offered - self.destinations_to_keep)
    }

    #[inline]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}
