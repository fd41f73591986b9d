use std::error::Error;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Bot;
use crate::bots::{HeuristicBot, HumanBot, RandomBot};

/// Returns a normalized label for a bot spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create a bot instance from a CLI-style spec.
/// Supported specs:
/// - human[:name]
/// - random[:seed]
/// - heuristic[:key=value,...] with keys `open`, `accept`, `raise`, `truco`, `hold`
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, Box<dyn Error>> {
    match label_for_spec(spec).as_str() {
        "human" => {
            let name = spec
                .split_once(':')
                .map(|(_, name)| name.trim().to_string())
                .unwrap_or_else(|| format!("Human {index}"));
            Ok(Box::new(HumanBot::new(name)))
        }
        "random" => {
            let custom_seed = spec
                .split_once(':')
                .and_then(|(_, value)| value.parse::<u64>().ok())
                .unwrap_or(seed ^ ((index as u64 + 1) * 0x9E37_79B9));
            Ok(Box::new(RandomBot::new(StdRng::seed_from_u64(custom_seed))))
        }
        "heuristic" => {
            let mut bot = HeuristicBot::default();
            if let Some((_, overrides)) = spec.split_once(':') {
                tune_heuristic(&mut bot, overrides)?;
            }
            Ok(Box::new(bot))
        }
        _ => Err(format!("unrecognized bot spec: {spec}").into()),
    }
}

fn tune_heuristic(bot: &mut HeuristicBot, overrides: &str) -> Result<(), Box<dyn Error>> {
    for pair in overrides.split(',').filter(|pair| !pair.trim().is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
        let value: u8 = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid threshold '{value}' for '{key}'"))?;
        match key.trim() {
            "open" => bot.open_envido_at = value,
            "accept" => bot.accept_envido_at = value,
            "raise" => bot.raise_envido_at = value,
            "truco" => bot.call_truco_tier = value,
            "hold" => bot.accept_truco_strength = u32::from(value),
            other => return Err(format!("unknown heuristic threshold '{other}'").into()),
        }
    }
    Ok(())
}
