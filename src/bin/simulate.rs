use std::error::Error;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use truco::{Bot, Game, GameBuilder, GameError, create_bot_from_spec, describe_action, render_state};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play a truco match between two bots or humans.")]
struct Args {
    /// Show the hand state and chosen actions at every step
    #[arg(long)]
    visualize: bool,

    /// Seed for shuffling (each hand derives its own)
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Points needed to win the match
    #[arg(long, default_value_t = 15)]
    target: u32,

    /// Stop after this many hands even without a match winner
    #[arg(long = "max-hands")]
    max_hands: Option<usize>,

    /// Player specs, seat 0 first: human[:name], random[:seed], heuristic[:key=value,...]
    bots: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let specs = if args.bots.is_empty() {
        vec![String::from("human"), String::from("heuristic")]
    } else {
        args.bots.clone()
    };
    if specs.len() != 2 {
        return Err(format!("truco is played by exactly 2 players, received {}", specs.len()).into());
    }

    let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(2);
    for (index, spec) in specs.iter().enumerate() {
        bots.push(create_bot_from_spec(spec, index, args.seed)?);
    }

    println!("Starting truco match to {} points.\n", args.target);
    let mut game = GameBuilder::new().with_seed(args.seed).build()?;
    let mut hands = 0usize;
    loop {
        play_hand(&mut game, &mut bots, args.visualize)?;
        hands += 1;
        let board = game.scoreboard();
        println!(
            "Hand {hands} done: {}. Score {} - {}",
            match game.winner() {
                Some(winner) => format!("points to Player {winner}"),
                None => String::from("aborted"),
            },
            board.points(0),
            board.points(1)
        );
        if let Some(champion) = board.reached(args.target) {
            println!("\nMatch finished. Winner: Player {champion} ({}).", specs[champion]);
            break;
        }
        if args.max_hands.is_some_and(|limit| hands >= limit) {
            println!("\nHand limit reached. Stopping simulation.");
            break;
        }
        game = game.next_hand(args.seed.wrapping_add(hands as u64)).build()?;
    }
    Ok(())
}

fn play_hand(game: &mut Game, bots: &mut [Box<dyn Bot>], visualize: bool) -> Result<(), Box<dyn Error>> {
    while !game.is_finished() {
        let current = game.current_turn_holder();
        let state = game.state_view(current)?;
        let legal_actions = game.legal_actions(current)?;
        if legal_actions.is_empty() {
            return Err(GameError::InvariantViolation("no legal actions available for turn holder").into());
        }
        if visualize {
            println!("{}", render_state(&state));
        }
        let action = bots[current].select_action(&state, &legal_actions);
        if visualize {
            println!("Player {current} chose: {}\n", describe_action(&state, &action));
        }
        game.take_action(current, action)?;
    }
    Ok(())
}
