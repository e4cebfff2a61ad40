use self::private::Statistics;
use shoe21::simulation::{Card, Hand, RoundEventHandler, RoundResult};
use shoe21::{Decision, InitialSituation};

mod private {
    /// Running wallet of a player staking one unit per round.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Statistics {
        current_money: i64,
        total_bet: u64,
        last_money: i64,
        min_money: i64,
    }

    impl Statistics {
        pub fn settle(&mut self, bet: u64, delta: i64) {
            self.total_bet += bet;
            self.current_money += delta;
            if self.min_money > self.current_money {
                self.min_money = self.current_money;
            }
        }

        pub fn get_current_money(&self) -> i64 {
            self.current_money
        }

        pub fn get_total_bet(&self) -> u64 {
            self.total_bet
        }

        pub fn get_rate(&self) -> f64 {
            if self.total_bet == 0 {
                0.0
            } else {
                self.current_money as f64 / self.total_bet as f64
            }
        }

        pub fn get_delta_money(&mut self) -> i64 {
            let ret = self.current_money - self.last_money;
            self.last_money = self.current_money;
            ret
        }

        pub fn get_min_money(&self) -> i64 {
            self.min_money
        }
    }
}

/// Follows a simulation run. With `verbose` set every round is printed as it resolves.
#[derive(Debug, Clone, Default)]
pub struct Handler {
    verbose: bool,
    round_id: u64,
    decisions: Vec<Decision>,
    stat: Statistics,
}

impl Handler {
    pub fn new(verbose: bool) -> Self {
        Handler {
            verbose,
            ..Default::default()
        }
    }

    pub fn rounds_played(&self) -> u64 {
        self.round_id
    }

    pub fn summary(&self) -> String {
        format!(
            "Money: {}. Total bet: {}. Rate: {:.2}%. Min money: {}.",
            self.stat.get_current_money(),
            self.stat.get_total_bet(),
            self.stat.get_rate() * 100.0,
            self.stat.get_min_money(),
        )
    }
}

impl RoundEventHandler for Handler {
    fn on_deal_cards(&mut self, _: &InitialSituation, _: &Hand, _: Card) {
        self.round_id += 1;
        self.decisions.clear();
    }

    fn on_make_decision(&mut self, decision: Decision, _: &Hand) {
        self.decisions.push(decision);
    }

    fn on_round_resolved(&mut self, result: &RoundResult, player_hand: &Hand, dealer_hand: &Hand) {
        self.stat.settle(1, result.wallet_delta());
        if !self.verbose {
            return;
        }

        println!("Round #{}", self.round_id);
        print!("Decisions:");
        for decision in &self.decisions {
            print!(" {}", decision);
        }
        if player_hand.is_bust() {
            print!(" BUST");
        }
        println!();
        println!("Player hand: {}", player_hand);
        println!("Dealer hand: {}", dealer_hand);
        println!(
            "{}. Money: {}({:+}).",
            result.outcome,
            self.stat.get_current_money(),
            self.stat.get_delta_money(),
        );
        println!("----------------------------------------------------");
    }
}
