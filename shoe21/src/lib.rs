pub mod aggregation;
mod cardcount;
mod error;
pub mod simulation;
pub mod strategy;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use cardcount::CardCount;
pub use error::GameError;

pub const DEFAULT_NUMBER_OF_DECKS: u8 = 6;
/// Keeps every per-shoe count within `u16`.
pub const MAX_NUMBER_OF_DECKS: u8 = 16;
pub const DEFAULT_RESHUFFLE_THRESHOLD: u16 = 100;
/// The dealer draws while below this total and stands on any hard or soft total at or above it.
pub const DEALER_STAND_TOTAL: u16 = 17;
pub const BLACKJACK: u16 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub number_of_decks: u8,
    /// The shoe is reshuffled before the next draw once this many cards or fewer remain.
    pub reshuffle_threshold: u16,
}

impl Rule {
    pub fn shoe_size(&self) -> usize {
        self.number_of_decks as usize * 52
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.number_of_decks == 0 || self.number_of_decks > MAX_NUMBER_OF_DECKS {
            return Err(GameError::InvalidRule(format!(
                "number_of_decks must be between 1 and {}",
                MAX_NUMBER_OF_DECKS
            )));
        }
        if self.reshuffle_threshold as usize >= self.shoe_size() {
            return Err(GameError::InvalidRule(format!(
                "reshuffle_threshold ({}) must be smaller than the shoe size ({})",
                self.reshuffle_threshold,
                self.shoe_size()
            )));
        }
        Ok(())
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: DEFAULT_NUMBER_OF_DECKS,
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
        }
    }
}

/// What the player knows before the first decision: their two-card total and the dealer's up-card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InitialSituation {
    pub player_total: u16,
    pub dealer_up_card: u8,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum Decision {
    Hit,
    Stand,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn wallet_delta(self) -> i64 {
        match self {
            Outcome::Win => 1,
            Outcome::Loss => -1,
            Outcome::Draw => 0,
        }
    }
}
