use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{simulation::Card, simulation::Hand, Decision, DEALER_STAND_TOTAL};

/// Where the player's decisions come from.
pub trait Strategy {
    fn make_decision(&mut self, player_hand: &Hand, dealer_up_card: Card) -> Decision;
}

/// Hits or stands with equal probability, ignoring the cards.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(rng: StdRng) -> Self {
        RandomStrategy { rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Strategy for RandomStrategy {
    fn make_decision(&mut self, _: &Hand, _: Card) -> Decision {
        if self.rng.gen_bool(0.5) {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

/// Hits while the hand total is below `hit_below`, then stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStrategy {
    hit_below: u16,
}

impl ThresholdStrategy {
    pub fn new(hit_below: u16) -> Self {
        ThresholdStrategy { hit_below }
    }

    pub fn hit_below(&self) -> u16 {
        self.hit_below
    }
}

/// Plays like the dealer.
impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::new(DEALER_STAND_TOTAL)
    }
}

impl Strategy for ThresholdStrategy {
    fn make_decision(&mut self, player_hand: &Hand, _: Card) -> Decision {
        if player_hand.total_value() < self.hit_below {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

/// Replays a fixed list of decisions, then keeps answering `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedStrategy {
    decisions: VecDeque<Decision>,
    fallback: Decision,
}

impl ScriptedStrategy {
    pub fn new(decisions: Vec<Decision>, fallback: Decision) -> Self {
        ScriptedStrategy {
            decisions: decisions.into(),
            fallback,
        }
    }

    pub fn remaining(&self) -> usize {
        self.decisions.len()
    }
}

impl Strategy for ScriptedStrategy {
    fn make_decision(&mut self, _: &Hand, _: Card) -> Decision {
        self.decisions.pop_front().unwrap_or(self.fallback)
    }
}
