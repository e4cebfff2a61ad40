use thiserror::Error;

use crate::simulation::{Rank, RoundPhase};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// The shoe could not be replenished. Fatal for the round in progress.
    #[error("The shoe of {number_of_decks} deck(s) is exhausted and cannot be replenished")]
    ShoeExhausted { number_of_decks: u8 },

    #[error("No {0} left in the shoe to place on top")]
    CardUnavailable(Rank),

    #[error("{operation} is only allowed in {allowed} phase, but the round is in {actual:?} phase")]
    WrongPhase {
        operation: &'static str,
        allowed: &'static str,
        actual: RoundPhase,
    },

    #[error("Internal error: {0}")]
    Internal(&'static str),
}
