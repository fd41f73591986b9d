use std::collections::HashMap;
use std::error::Error;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use truco::{Bot, GameBuilder, GameError, create_bot_from_spec, label_for_spec};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(name = "winrate", about = "Run many truco matches and report per-bot win rates.")]
struct Args {
    /// Number of matches to simulate
    #[arg(short = 'm', long = "matches", default_value_t = 200)]
    matches: usize,

    /// Base RNG seed (deals and bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Points needed to win a match
    #[arg(long, default_value_t = 15)]
    target: u32,

    /// Safety cap on hands per match; matches exceeding it count for nobody
    #[arg(long = "max-hands", default_value_t = 200)]
    max_hands: usize,

    /// Player bot specs, exactly two: e.g. heuristic random
    bots: Vec<String>,
}

#[derive(Default)]
struct Tally {
    seats: usize,
    wins: usize,
    points: u64,
    decisions: usize,
    decision_ns: u128,
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
    if args.bots.len() != 2 {
        return Err(format!("expected exactly 2 bot specs, received {}", args.bots.len()).into());
    }
    // Disallow human in batch sims; it would block waiting for input.
    if args.bots.iter().any(|spec| label_for_spec(spec) == "human") {
        return Err("human players are not supported in winrate runs".into());
    }

    let mut tallies: HashMap<String, Tally> = HashMap::new();
    let mut unfinished = 0usize;

    for match_idx in 0..args.matches {
        // Swap seats every other match so neither spec always starts as mano.
        let order: [usize; 2] = if match_idx % 2 == 0 { [0, 1] } else { [1, 0] };
        let labels: Vec<String> = order.iter().map(|i| label_for_spec(&args.bots[*i])).collect();
        let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(2);
        for (seat, src_idx) in order.iter().enumerate() {
            let bot_seed = mix_seed(args.seed, match_idx as u64, seat as u64);
            bots.push(create_bot_from_spec(&args.bots[*src_idx], seat, bot_seed)?);
        }
        for label in &labels {
            tallies.entry(label.clone()).or_default().seats += 1;
        }

        let mut game = GameBuilder::new()
            .with_seed(mix_seed(args.seed, match_idx as u64, 0x5EED))
            .build()?;
        let mut hands = 0usize;
        let champion = loop {
            while !game.is_finished() {
                let current = game.current_turn_holder();
                let state = game.state_view(current)?;
                let legal = game.legal_actions(current)?;
                if legal.is_empty() {
                    return Err(GameError::InvariantViolation("no legal actions available").into());
                }
                let started = Instant::now();
                let action = bots[current].select_action(&state, &legal);
                let tally = tallies.entry(labels[current].clone()).or_default();
                tally.decision_ns += started.elapsed().as_nanos();
                tally.decisions += 1;
                game.take_action(current, action)?;
            }
            hands += 1;
            if let Some(champion) = game.scoreboard().reached(args.target) {
                break Some(champion);
            }
            if hands >= args.max_hands {
                break None;
            }
            let seed = mix_seed(args.seed, match_idx as u64, hands as u64 + 0x100);
            game = game.next_hand(seed).build()?;
        };

        for (seat, label) in labels.iter().enumerate() {
            tallies.entry(label.clone()).or_default().points += u64::from(game.scoreboard().points(seat));
        }
        match champion {
            Some(seat) => tallies.entry(labels[seat].clone()).or_default().wins += 1,
            None => unfinished += 1,
        }
    }

    let mut results: Vec<(&String, &Tally)> = tallies.iter().collect();
    results.sort_by(|a, b| b.1.wins.cmp(&a.1.wins).then_with(|| a.0.cmp(b.0)));

    println!("Match win rates (per seat):");
    for (label, tally) in &results {
        let rate = if tally.seats > 0 {
            tally.wins as f64 / tally.seats as f64
        } else {
            0.0
        };
        let avg_points = if tally.seats > 0 {
            tally.points as f64 / tally.seats as f64
        } else {
            0.0
        };
        println!(
            "  {label:<12}  {}/{}  ({:.2}%)   avg pts: {avg_points:>6.2}",
            tally.wins,
            tally.seats,
            rate * 100.0
        );
    }
    if unfinished > 0 {
        println!("\nNote: {unfinished} match(es) hit the hand cap without a winner.");
    }

    println!("\nDecision time (per bot label):");
    for (label, tally) in &results {
        let total_ms = tally.decision_ns as f64 / 1.0e6;
        let avg_ms = if tally.decisions > 0 {
            total_ms / tally.decisions as f64
        } else {
            0.0
        };
        println!(
            "  {label:<12}  decisions: {:<7}  total: {total_ms:.3} ms  avg: {avg_ms:.3} ms",
            tally.decisions
        );
    }

    Ok(())
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
