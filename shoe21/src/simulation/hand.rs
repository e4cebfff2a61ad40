use crate::{CardCount, BLACKJACK};

use super::Card;

/// The cards dealt to one party, player or dealer, for one round.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
    card_count: CardCount,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(5),
            card_count: CardCount::default(),
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.card_count.add_card(card);
    }

    /// Every Ace counts 11 until the total goes over 21, then Aces drop to 1
    /// one at a time. The result is above 21 only when no Ace is left to drop.
    pub fn total_value(&self) -> u16 {
        self.reduce_aces().0
    }

    pub fn is_bust(&self) -> bool {
        self.total_value() > BLACKJACK
    }

    /// Whether an Ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        self.reduce_aces().1 > 0
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get_card_count(&self) -> &CardCount {
        &self.card_count
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.card_count = CardCount::default();
    }

    /// Returns the total and the number of Aces still counted as 11.
    fn reduce_aces(&self) -> (u16, u16) {
        let mut total = self.card_count.get_sum();
        let mut soft_aces = self.card_count.get_aces();
        while total > BLACKJACK && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        (total, soft_aces)
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for card in &self.cards {
            write!(f, "{} ", card)?;
        }
        write!(f, "({})", self.total_value())
    }
}
