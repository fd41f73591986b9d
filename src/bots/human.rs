use std::io::{self, BufRead, Write};

use crate::action::{Action, BidCall, Response, Rung};
use crate::bot::Bot;
use crate::state::HandStateView;
use crate::visualize::{describe_action, render_state};

/// Interactive bot that reads choices from standard input.
///
/// Accepts either the index printed next to an action or the table call itself
/// ("quiero", "no quiero", "envido", "truco", "mazo", ...).
pub struct HumanBot {
    name: String,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn prompt(&self, state: &HandStateView, legal_actions: &[Action]) {
        println!("\n--- {} to act (seat {}) ---", self.name, state.self_player);
        println!("{}", render_state(state));
        for (index, action) in legal_actions.iter().enumerate() {
            println!("  [{index}] {}", describe_action(state, action));
        }
        print!("Choice (index, call, 'help' or 'q'): ");
        if io::stdout().flush().is_err() {
            eprintln!("failed to flush stdout");
        }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

/// Parsed line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Pick(Action),
    Help,
    Quit,
    Unknown,
}

/// Maps a line to one of `legal_actions`. A bare number is a list index; a number
/// after "play" (or "jugar") is the position of a card in hand.
fn parse_command(input: &str, hand_cards: &[Action], legal_actions: &[Action]) -> Command {
    let line = input.trim().to_ascii_lowercase();
    let called = match line.as_str() {
        "q" | "quit" => return Command::Quit,
        "help" | "?" => return Command::Help,
        "quiero" | "accept" | "yes" => Some(Action::Respond(Response::Accept)),
        "no quiero" | "decline" | "no" => Some(Action::Respond(Response::Decline)),
        "envido" => Some(Action::Bid(BidCall::Envido)),
        "real envido" => Some(Action::Bid(BidCall::RealEnvido)),
        "falta envido" => Some(Action::Bid(BidCall::FaltaEnvido)),
        "truco" => Some(Action::Escalate(Rung::Truco)),
        "retruco" => Some(Action::Escalate(Rung::Retruco)),
        "vale cuatro" | "vale 4" => Some(Action::Escalate(Rung::ValeCuatro)),
        "mazo" | "fold" => Some(Action::Fold),
        _ => None,
    };
    if let Some(action) = called {
        return if legal_actions.contains(&action) {
            Command::Pick(action)
        } else {
            Command::Unknown
        };
    }
    if let Some(rest) = line
        .strip_prefix("play ")
        .or_else(|| line.strip_prefix("jugar "))
    {
        return rest
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|slot| hand_cards.get(slot))
            .filter(|action| legal_actions.contains(action))
            .map_or(Command::Unknown, |action| Command::Pick(*action));
    }
    line.parse::<usize>()
        .ok()
        .and_then(|index| legal_actions.get(index))
        .map_or(Command::Unknown, |action| Command::Pick(*action))
}

impl Bot for HumanBot {
    fn select_action(&mut self, state: &HandStateView, legal_actions: &[Action]) -> Action {
        assert!(
            !legal_actions.is_empty(),
            "at least one legal action must exist"
        );
        let hand_cards: Vec<Action> = state.hand.iter().copied().map(Action::PlayCard).collect();
        let stdin = io::stdin();
        loop {
            self.prompt(state, legal_actions);
            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    println!("\nInput closed, leaving the table.");
                    std::process::exit(0);
                }
                Ok(_) => {}
                Err(err) => {
                    eprintln!("failed to read input: {err}");
                    continue;
                }
            }
            match parse_command(&input, &hand_cards, legal_actions) {
                Command::Pick(action) => {
                    println!("{} chose: {}", self.name, describe_action(state, &action));
                    return action;
                }
                Command::Help => {
                    println!("Type an index from the list, or the call itself: quiero, no quiero,");
                    println!("envido, real envido, falta envido, truco, retruco, vale cuatro, mazo.");
                    println!("'play N' plays the card at position N of your hand.");
                    println!("Envido may only be called in the first round, before truco.");
                    println!("Going to the mazo concedes a pending envido, otherwise the hand.");
                }
                Command::Quit => {
                    println!("Leaving the table at user's request.");
                    std::process::exit(0);
                }
                Command::Unknown => {
                    println!("'{}' is not available right now.", input.trim());
                }
            }
        }
    }
}
