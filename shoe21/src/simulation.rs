pub mod hand;
pub mod shoe;

use crate::{
    strategy::Strategy, Decision, GameError, InitialSituation, Outcome, BLACKJACK,
    DEALER_STAND_TOTAL,
};
use shoe21_macros::allowed_phase;
use strum_macros::EnumIter;
use tracing::trace;

pub use self::{hand::Hand, shoe::Shoe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Blackjack value of the rank. Aces count 11 here; reducing them is the hand's job.
    pub fn value(self) -> u8 {
        match self {
            Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
            numeric => numeric as u8,
        }
    }

    fn symbol(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Represents a card in the real world with a rank and a suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suit = match self.suit {
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        };
        write!(f, "{}{}", self.rank, suit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub outcome: Outcome,
    pub initial_situation: InitialSituation,
    /// The first decision of the round. Later decisions are not part of the statistics key.
    pub initial_decision: Decision,
    pub player_total: u16,
    pub dealer_total: u16,
    /// False when the player busted and the dealer turn was skipped.
    pub dealer_played: bool,
}

impl RoundResult {
    pub fn wallet_delta(&self) -> i64 {
        self.outcome.wallet_delta()
    }
}

/// Compares final totals. A player bust loses even if the dealer would have busted too.
pub fn resolve_outcome(player_total: u16, dealer_total: u16) -> Outcome {
    if player_total > BLACKJACK {
        Outcome::Loss
    } else if dealer_total > BLACKJACK || player_total > dealer_total {
        Outcome::Win
    } else if player_total < dealer_total {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}

/// Plays rounds of hit-or-stand blackjack against a dealer who stands on 17.
///
/// The engine owns the shoe, so the shoe carries over from one round to the
/// next. Each phase method can only be called in its phase; the order is
/// `deal_initial_cards`, then `play_hit` / `play_stand`, then
/// `dealer_plays_and_resolve`, then `start_new_round`. `play_round` drives a
/// whole round with a strategy.
pub struct RoundEngine {
    shoe: Shoe,
    current_phase: RoundPhase,
    player_hand: Hand,
    dealer_hand: Hand,
    initial_situation: Option<InitialSituation>,
    initial_decision: Option<Decision>,
    result: Option<RoundResult>,
}

impl RoundEngine {
    pub fn new(shoe: Shoe) -> Self {
        Self {
            shoe,
            current_phase: RoundPhase::Dealing,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            initial_situation: None,
            initial_decision: None,
            result: None,
        }
    }

    /// Plays a whole round, asking `strategy` for every player decision and
    /// reporting progress to `handler`. Can be called at Dealing or Resolved
    /// phase; a resolved round is cleared first.
    #[allowed_phase(Dealing, Resolved)]
    pub fn play_round<S, H>(
        &mut self,
        strategy: &mut S,
        handler: &mut H,
    ) -> Result<RoundResult, GameError>
    where
        S: Strategy + ?Sized,
        H: RoundEventHandler + ?Sized,
    {
        if self.current_phase == RoundPhase::Resolved {
            self.start_new_round()?;
        }

        let initial_situation = self.deal_initial_cards()?;
        let dealer_up_card = self
            .dealer_up_card()
            .ok_or(GameError::Internal("dealer has no up-card after the deal"))?;
        handler.on_deal_cards(&initial_situation, &self.player_hand, dealer_up_card);

        loop {
            let decision = strategy.make_decision(&self.player_hand, dealer_up_card);
            handler.on_make_decision(decision, &self.player_hand);
            match decision {
                Decision::Hit => {
                    if self.play_hit()? {
                        handler.on_player_bust(&self.player_hand);
                        break;
                    }
                }
                Decision::Stand => {
                    self.play_stand()?;
                    self.dealer_plays_and_resolve()?;
                    handler.on_dealer_play(&self.dealer_hand);
                    break;
                }
            }
        }

        let result = self
            .result
            .ok_or(GameError::Internal("round finished without a result"))?;
        handler.on_round_resolved(&result, &self.player_hand, &self.dealer_hand);
        Ok(result)
    }

    /// Can be called at Dealing phase.
    /// Deals player, dealer, player, dealer. The dealer's first card is the up-card.
    #[allowed_phase(Dealing)]
    pub fn deal_initial_cards(&mut self) -> Result<InitialSituation, GameError> {
        for _ in 0..2 {
            let card = self.shoe.draw()?;
            self.player_hand.add_card(card);
            let card = self.shoe.draw()?;
            self.dealer_hand.add_card(card);
        }

        let dealer_up_card = self
            .dealer_up_card()
            .ok_or(GameError::Internal("dealer has no up-card after the deal"))?;
        let initial_situation = InitialSituation {
            player_total: self.player_hand.total_value(),
            dealer_up_card: dealer_up_card.value(),
        };
        self.initial_situation = Some(initial_situation);
        self.current_phase = RoundPhase::PlayerTurn;
        Ok(initial_situation)
    }

    /// Can be called at PlayerTurn phase.
    /// Returns true if the player busts, in which case the round is already resolved as a loss.
    #[allowed_phase(PlayerTurn)]
    pub fn play_hit(&mut self) -> Result<bool, GameError> {
        self.initial_decision.get_or_insert(Decision::Hit);
        let card = self.shoe.draw()?;
        self.player_hand.add_card(card);
        if self.player_hand.is_bust() {
            self.resolve(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Can be called at PlayerTurn phase.
    #[allowed_phase(PlayerTurn)]
    pub fn play_stand(&mut self) -> Result<(), GameError> {
        self.initial_decision.get_or_insert(Decision::Stand);
        self.current_phase = RoundPhase::DealerTurn;
        Ok(())
    }

    /// Can be called at DealerTurn phase.
    /// The dealer draws until reaching 17 or more, soft totals included, then the round is settled.
    #[allowed_phase(DealerTurn)]
    pub fn dealer_plays_and_resolve(&mut self) -> Result<RoundResult, GameError> {
        while self.dealer_hand.total_value() < DEALER_STAND_TOTAL {
            let card = self.shoe.draw()?;
            self.dealer_hand.add_card(card);
        }
        self.resolve(true)
    }

    /// Can be called at Resolved phase.
    /// Clears both hands. The shoe is kept as is.
    #[allowed_phase(Resolved)]
    pub fn start_new_round(&mut self) -> Result<(), GameError> {
        self.player_hand.clear();
        self.dealer_hand.clear();
        self.initial_situation = None;
        self.initial_decision = None;
        self.result = None;
        self.current_phase = RoundPhase::Dealing;
        Ok(())
    }

    pub fn current_phase(&self) -> RoundPhase {
        self.current_phase
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer_hand.cards().first().copied()
    }

    pub fn initial_situation(&self) -> Option<InitialSituation> {
        self.initial_situation
    }

    /// The result of the current round once it is resolved.
    pub fn result(&self) -> Option<RoundResult> {
        self.result
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn shoe_mut(&mut self) -> &mut Shoe {
        &mut self.shoe
    }

    fn resolve(&mut self, dealer_played: bool) -> Result<RoundResult, GameError> {
        let initial_situation = self
            .initial_situation
            .ok_or(GameError::Internal("round resolved before the initial deal"))?;
        let initial_decision = self
            .initial_decision
            .ok_or(GameError::Internal("round resolved before any decision"))?;
        let player_total = self.player_hand.total_value();
        let dealer_total = self.dealer_hand.total_value();
        let result = RoundResult {
            outcome: resolve_outcome(player_total, dealer_total),
            initial_situation,
            initial_decision,
            player_total,
            dealer_total,
            dealer_played,
        };
        trace!(
            player = %self.player_hand,
            dealer = %self.dealer_hand,
            outcome = %result.outcome,
            "round resolved"
        );

        self.result = Some(result);
        self.current_phase = RoundPhase::Resolved;
        Ok(result)
    }
}

/// Receives what happens during `RoundEngine::play_round`. Every method does
/// nothing by default.
pub trait RoundEventHandler {
    fn on_deal_cards(
        &mut self,
        _initial_situation: &InitialSituation,
        _player_hand: &Hand,
        _dealer_up_card: Card,
    ) {
    }
    fn on_make_decision(&mut self, _decision: Decision, _player_hand: &Hand) {}
    fn on_player_bust(&mut self, _player_hand: &Hand) {}
    fn on_dealer_play(&mut self, _dealer_hand: &Hand) {}
    fn on_round_resolved(&mut self, _result: &RoundResult, _player_hand: &Hand, _dealer_hand: &Hand) {
    }
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentHandler;

impl RoundEventHandler for SilentHandler {}
