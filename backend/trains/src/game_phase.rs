use serde::{Deserialize, Serialize};

/// Phases of a game, which act as states in the referee's finite-state machine.
///
/// # JSON
/// Phases are serialized in snake_case.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Participants receive the board, their pieces and first cards, and pick their destinations.
    ///
    /// Once every participant went through setup, we move on to [`GamePhase::Play`].
    Setup,
    /// The turn-based game.
    ///
    /// Lasts until nobody is left, nobody changed the state for a whole round, or the active
    /// participant is running out of pieces.
    Play,
    /// Scores are final and participants are told whether they won.
    ///
    /// No actions can be taken at this point.
    End,
}

impl GamePhase {
    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Setup => Some(Self::Play),
            Self::Play => Some(Self::End),
            Self::End => None,
        }
    }
}
