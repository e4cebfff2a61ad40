use std::ops::{AddAssign, Index, SubAssign};

use crate::simulation::Card;

const LOWEST_VALUE: u8 = 2;
const ACE_VALUE: u8 = 11;

/// This provides a container to store the numbers of each card value (from
/// 2 to 11 inclusive, where 11 is the Ace and 10 covers T, J, Q and K).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardCount {
    counts: [u16; 10],
    sum: u16,
    total: u16,
}

impl CardCount {
    pub fn new(counts: &[u16; 10]) -> CardCount {
        let mut card_count = CardCount {
            counts: *counts,
            sum: 0,
            total: 0,
        };

        card_count.propagate_counts();

        card_count
    }

    /// The composition of a full shoe of the given number of standard decks.
    pub fn with_number_of_decks(number_of_decks: u8) -> CardCount {
        let mut counts = [number_of_decks as u16 * 4; 10];
        counts[index_of(10)] = number_of_decks as u16 * 16;
        Self::new(&counts)
    }

    pub fn add_card(&mut self, card: Card) {
        let value = card.value();
        self.counts[index_of(value)] += 1;
        self.sum += value as u16;
        self.total += 1;
    }

    /// Remove a card.
    ///
    /// Note that this method won't check if the number of the given card value is already 0.
    pub fn remove_card(&mut self, card: Card) {
        let value = card.value();
        self.counts[index_of(value)] -= 1;
        self.sum -= value as u16;
        self.total -= 1;
    }

    /// Note that this method treats every Ace as 11.
    pub fn get_sum(&self) -> u16 {
        self.sum
    }

    /// Number of cards.
    pub fn get_total(&self) -> u16 {
        self.total
    }

    pub fn get_aces(&self) -> u16 {
        self[ACE_VALUE]
    }

    fn propagate_counts(&mut self) {
        self.sum = 0;
        self.total = 0;
        for (i, count) in self.counts.iter().enumerate() {
            self.sum += (i as u16 + LOWEST_VALUE as u16) * count;
            self.total += count;
        }
    }
}

fn index_of(value: u8) -> usize {
    (value - LOWEST_VALUE) as usize
}

impl SubAssign<&CardCount> for CardCount {
    fn sub_assign(&mut self, rhs: &CardCount) {
        for i in 0..self.counts.len() {
            self.counts[i] -= rhs.counts[i];
        }

        self.total -= rhs.total;
        self.sum -= rhs.sum;
    }
}

impl AddAssign<&CardCount> for CardCount {
    fn add_assign(&mut self, rhs: &CardCount) {
        for i in 0..self.counts.len() {
            self.counts[i] += rhs.counts[i];
        }

        self.total += rhs.total;
        self.sum += rhs.sum;
    }
}

/// Indexed by card value, 2 to 11.
impl Index<u8> for CardCount {
    type Output = u16;
    fn index(&self, value: u8) -> &Self::Output {
        &self.counts[index_of(value)]
    }
}
