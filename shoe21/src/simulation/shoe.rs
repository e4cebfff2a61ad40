use crate::{CardCount, GameError, Rule};

use super::{Card, Rank, Suit};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use strum::IntoEnumIterator;
use tracing::debug;

/// Represents a shoe in the real world.
///
/// Cards are dealt from the top of the shoe. Once a draw leaves the shoe at or
/// below the reshuffle threshold, the next draw first puts every card back and
/// reshuffles, so the shoe never runs dry in the middle of a round.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    reshuffle_threshold: usize,
    cards: Vec<Card>,
    card_count: CardCount,
    size_at_last_reshuffle: usize,
    dealt_since_reshuffle: usize,
    reshuffle_count: u64,
    rng: StdRng,
}

impl Shoe {
    /// Creates a full, shuffled shoe that draws its randomness from `rng`.
    pub fn new(rule: &Rule, rng: StdRng) -> Result<Shoe, GameError> {
        rule.validate()?;
        let mut shoe = Shoe {
            number_of_decks: rule.number_of_decks,
            reshuffle_threshold: rule.reshuffle_threshold as usize,
            cards: Vec::with_capacity(rule.shoe_size()),
            card_count: CardCount::default(),
            size_at_last_reshuffle: 0,
            dealt_since_reshuffle: 0,
            reshuffle_count: 0,
            rng,
        };
        shoe.refill_and_shuffle();
        Ok(shoe)
    }

    pub fn with_seed(rule: &Rule, seed: u64) -> Result<Shoe, GameError> {
        Self::new(rule, StdRng::seed_from_u64(seed))
    }

    /// Deals the top card, reshuffling first if the shoe is at or below the threshold.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        if self.needs_reshuffle() {
            self.reshuffle();
        }
        let card = self.cards.pop().ok_or(GameError::ShoeExhausted {
            number_of_decks: self.number_of_decks,
        })?;
        self.card_count.remove_card(card);
        self.dealt_since_reshuffle += 1;
        Ok(card)
    }

    /// Returns every dealt card into the shoe and shuffles.
    pub fn reshuffle(&mut self) {
        self.refill_and_shuffle();
        self.reshuffle_count += 1;
        debug!(
            number_of_decks = self.number_of_decks,
            reshuffle_count = self.reshuffle_count,
            "refilled and shuffled shoe"
        );
    }

    /// Reshuffles, then moves cards of the given ranks to the top so they are
    /// dealt first, in the given order. Suits are picked from whatever the
    /// shoe holds. Fails if the shoe does not hold enough cards of a rank, in
    /// which case the shoe is left freshly shuffled.
    pub fn stack_with_firsts(&mut self, firsts: &[Rank]) -> Result<(), GameError> {
        self.reshuffle();

        let mut top = Vec::with_capacity(firsts.len());
        for rank in firsts {
            match self.cards.iter().position(|card| card.rank() == *rank) {
                Some(position) => top.push(self.cards.swap_remove(position)),
                None => {
                    self.reshuffle();
                    return Err(GameError::CardUnavailable(*rank));
                }
            }
        }
        self.cards.extend(top.into_iter().rev());
        Ok(())
    }

    /// Checks if the next draw will reshuffle the shoe.
    pub fn needs_reshuffle(&self) -> bool {
        self.cards.len() <= self.reshuffle_threshold
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn dealt_since_reshuffle(&self) -> usize {
        self.dealt_since_reshuffle
    }

    pub fn size_at_last_reshuffle(&self) -> usize {
        self.size_at_last_reshuffle
    }

    /// Number of reshuffles since the shoe was created. The initial shuffle does not count.
    pub fn reshuffle_count(&self) -> u64 {
        self.reshuffle_count
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }

    /// Composition of the cards not dealt yet.
    pub fn get_card_count(&self) -> &CardCount {
        &self.card_count
    }

    fn refill_and_shuffle(&mut self) {
        self.cards.clear();
        for _ in 0..self.number_of_decks {
            for suit in Suit::iter() {
                for rank in Rank::iter() {
                    self.cards.push(Card::new(rank, suit));
                }
            }
        }
        self.cards.shuffle(&mut self.rng);

        self.card_count = CardCount::with_number_of_decks(self.number_of_decks);
        self.size_at_last_reshuffle = self.cards.len();
        self.dealt_since_reshuffle = 0;
    }
}
