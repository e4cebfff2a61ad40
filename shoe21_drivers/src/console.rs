use std::fmt;
use std::io::{self, BufRead, Write};

use shoe21::simulation::{Card, Hand, RoundEventHandler, RoundResult};
use shoe21::strategy::Strategy;
use shoe21::{Decision, InitialSituation, Outcome};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PlayHand,
    RunSimulation,
    Exit,
}

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "p" => Some(MenuChoice::PlayHand),
        "2" | "s" => Some(MenuChoice::RunSimulation),
        "3" | "q" | "e" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// A single `h` or `s`, in either case.
pub fn parse_decision(input: &str) -> Option<Decision> {
    match input.trim() {
        "h" | "H" => Some(Decision::Hit),
        "s" | "S" => Some(Decision::Stand),
        _ => None,
    }
}

/// Asks a person for every decision. Anything but `h` or `s` is asked again;
/// once the input is closed the player stands.
pub struct ConsoleStrategy<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleStrategy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsoleStrategy { input, output }
    }

    /// Shows the menu until a valid choice is made. Returns None once the input is closed.
    pub fn read_menu_choice(&mut self) -> io::Result<Option<MenuChoice>> {
        loop {
            write!(
                self.output,
                "\n1) Play one hand\n2) Run simulation\n3) Exit\nChoice: "
            )?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Some(choice) = parse_menu_choice(&line) {
                return Ok(Some(choice));
            }
            writeln!(self.output, "Please enter 1, 2 or 3.")?;
        }
    }

    fn ask(&mut self, player_hand: &Hand) -> io::Result<Option<Decision>> {
        writeln!(self.output, "Your hand: {}", player_hand)?;
        loop {
            write!(self.output, "Hit (h) or Stand (s)? ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Some(decision) = parse_decision(&line) {
                return Ok(Some(decision));
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> Strategy for ConsoleStrategy<R, W> {
    fn make_decision(&mut self, player_hand: &Hand, _: Card) -> Decision {
        match self.ask(player_hand) {
            Ok(Some(decision)) => decision,
            Ok(None) => {
                warn!("input closed, standing");
                Decision::Stand
            }
            Err(err) => {
                warn!(%err, "cannot read decision, standing");
                Decision::Stand
            }
        }
    }
}

/// Prints a round as it is played and keeps a running wallet.
pub struct ConsoleHandler<W> {
    output: W,
    wallet: i64,
}

impl<W: Write> ConsoleHandler<W> {
    pub fn new(output: W) -> Self {
        ConsoleHandler { output, wallet: 0 }
    }

    pub fn wallet(&self) -> i64 {
        self.wallet
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    fn print(&mut self, args: fmt::Arguments) {
        if let Err(err) = self.output.write_fmt(args).and_then(|_| self.output.flush()) {
            warn!(%err, "cannot write to console");
        }
    }
}

impl<W: Write> RoundEventHandler for ConsoleHandler<W> {
    fn on_deal_cards(&mut self, _: &InitialSituation, _: &Hand, dealer_up_card: Card) {
        self.print(format_args!("Dealer's first card: {}\n", dealer_up_card));
    }

    fn on_player_bust(&mut self, player_hand: &Hand) {
        self.print(format_args!("Your hand: {}\nBust! You lose.\n", player_hand));
    }

    fn on_dealer_play(&mut self, dealer_hand: &Hand) {
        self.print(format_args!("Dealer's hand: {}\n", dealer_hand));
    }

    fn on_round_resolved(&mut self, result: &RoundResult, _: &Hand, _: &Hand) {
        self.wallet += result.wallet_delta();
        if result.dealer_played {
            let message = match result.outcome {
                Outcome::Win => "You win!",
                Outcome::Loss => "You lose.",
                Outcome::Draw => "Draw.",
            };
            self.print(format_args!("{}\n", message));
        }
        let wallet = self.wallet;
        self.print(format_args!("Wallet: {:+}\n", wallet));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoe21::simulation::{Rank, RoundEngine, Shoe};
    use shoe21::Rule;
    use std::io::Cursor;

    fn engine_with_firsts(firsts: &[Rank]) -> RoundEngine {
        let mut shoe = Shoe::with_seed(&Rule::default(), 8).unwrap();
        shoe.stack_with_firsts(firsts).unwrap();
        RoundEngine::new(shoe)
    }

    #[test]
    fn parses_decisions() {
        assert_eq!(parse_decision("h\n"), Some(Decision::Hit));
        assert_eq!(parse_decision(" S "), Some(Decision::Stand));
        assert_eq!(parse_decision("hit"), None);
        assert_eq!(parse_decision(""), None);
        assert_eq!(parse_decision("x"), None);
    }

    #[test]
    fn parses_menu_choices() {
        assert_eq!(parse_menu_choice("1\n"), Some(MenuChoice::PlayHand));
        assert_eq!(parse_menu_choice("S"), Some(MenuChoice::RunSimulation));
        assert_eq!(parse_menu_choice("3"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("q"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("4"), None);
    }

    #[test]
    fn invalid_input_asks_again() {
        let input = Cursor::new("x\nhit\nh\n");
        let mut strategy = ConsoleStrategy::new(input, Vec::new());
        let mut engine = engine_with_firsts(&[Rank::Five, Rank::Ten, Rank::Four, Rank::Seven]);
        engine.deal_initial_cards().unwrap();
        let up_card = engine.dealer_up_card().unwrap();
        assert_eq!(
            strategy.make_decision(engine.player_hand(), up_card),
            Decision::Hit
        );
        let output = String::from_utf8(strategy.output).unwrap();
        assert_eq!(output.matches("Hit (h) or Stand (s)?").count(), 3);
        assert!(output.starts_with("Your hand: 5"));
    }

    #[test]
    fn closed_input_stands() {
        let mut strategy = ConsoleStrategy::new(Cursor::new(""), Vec::new());
        let mut engine = engine_with_firsts(&[]);
        engine.deal_initial_cards().unwrap();
        let up_card = engine.dealer_up_card().unwrap();
        assert_eq!(
            strategy.make_decision(engine.player_hand(), up_card),
            Decision::Stand
        );
    }

    #[test]
    fn menu_reprompts_until_valid() {
        let mut strategy = ConsoleStrategy::new(Cursor::new("9\n2\n"), Vec::new());
        assert_eq!(
            strategy.read_menu_choice().unwrap(),
            Some(MenuChoice::RunSimulation)
        );
        let mut strategy = ConsoleStrategy::new(Cursor::new(""), Vec::new());
        assert_eq!(strategy.read_menu_choice().unwrap(), None);
    }

    #[test]
    fn interactive_round_prints_like_the_table() {
        let mut engine =
            engine_with_firsts(&[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Eight, Rank::King]);
        let mut strategy = ConsoleStrategy::new(Cursor::new("s\n"), Vec::new());
        let mut handler = ConsoleHandler::new(Vec::new());
        let result = engine.play_round(&mut strategy, &mut handler).unwrap();
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(handler.wallet(), 1);

        let output = String::from_utf8(handler.into_inner()).unwrap();
        assert!(output.contains("Dealer's first card: T"));
        assert!(output.contains("Dealer's hand: T"));
        assert!(output.contains("(18)"));
        assert!(output.contains("You win!"));
        assert!(output.contains("Wallet: +1"));
    }

    #[test]
    fn bust_is_reported_once() {
        let mut engine =
            engine_with_firsts(&[Rank::Ten, Rank::Ten, Rank::Nine, Rank::Eight, Rank::King]);
        let mut strategy = ConsoleStrategy::new(Cursor::new("h\n"), Vec::new());
        let mut handler = ConsoleHandler::new(Vec::new());
        engine.play_round(&mut strategy, &mut handler).unwrap();
        assert_eq!(handler.wallet(), -1);

        let output = String::from_utf8(handler.into_inner()).unwrap();
        assert!(output.contains("Bust! You lose."));
        assert!(!output.contains("Dealer's hand"));
        assert_eq!(output.matches("lose").count(), 1);
    }
}
