use std::fmt::Write;

use crate::action::{Action, Response, opponent};
use crate::envido::EnvidoStatus;
use crate::state::{HandStateView, HandStatus};
use crate::tricks::TrickOutcome;
use crate::truco::TrucoStatus;

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_played_cards: bool,
    pub show_awards: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_played_cards: true,
            show_awards: true,
        }
    }
}

pub fn render_state(state: &HandStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &HandStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        HandStatus::Ongoing => String::from("Ongoing"),
        HandStatus::Finished { winner: Some(winner) } => {
            format!("Finished (points to Player {winner})")
        }
        HandStatus::Finished { winner: None } => String::from("Aborted"),
    };
    let _ = writeln!(out, "Hand status: {status}");
    let _ = writeln!(
        out,
        "Mano: Player {}  |  Round: {}  |  To act: Player {}{}",
        state.mano,
        state.round + 1,
        state.turn_holder,
        if state.turn_holder == state.self_player {
            " (You)"
        } else {
            ""
        }
    );
    let _ = writeln!(out, "Envido: {}", describe_envido(&state.envido));
    let _ = writeln!(out, "Truco: {}", describe_truco(&state.truco));

    if options.show_played_cards {
        let _ = writeln!(out, "Tricks:");
        for (round, pair) in state.cards_played.chunks(2).enumerate() {
            let cards = pair
                .iter()
                .map(|played| format!("P{} {}", played.player, played.card))
                .collect::<Vec<_>>()
                .join(" vs ");
            let result = match state.tricks.get(round) {
                Some(TrickOutcome::Won(player)) => format!(" -> Player {player}"),
                Some(TrickOutcome::Parda) => String::from(" -> parda"),
                None => String::new(),
            };
            let _ = writeln!(out, "  [{}] {cards}{result}", round + 1);
        }
    }

    let hand = if state.hand.is_empty() {
        String::from("(empty)")
    } else {
        state
            .hand
            .iter()
            .enumerate()
            .map(|(idx, card)| format!("{idx}:{card}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    let _ = writeln!(out, "Your hand: {hand}");
    let _ = writeln!(
        out,
        "Player {} holds {} card(s)",
        opponent(state.self_player),
        state.opponent_hand_size
    );

    let _ = writeln!(out, "Scoreboard:");
    for (player, points) in state.scoreboard.rows() {
        let you = if *player == state.self_player {
            " (You)"
        } else {
            ""
        };
        let _ = writeln!(out, "  Player {player}{you}: {points}");
    }
    if options.show_awards && !state.awards.is_empty() {
        let _ = writeln!(out, "This hand:");
        for award in &state.awards {
            let _ = writeln!(
                out,
                "  +{} to Player {} ({:?})",
                award.points, award.player, award.reason
            );
        }
    }
    out
}

pub fn describe_action(state: &HandStateView, action: &Action) -> String {
    match action {
        Action::Bid(call) => format!("Call {call}"),
        Action::Escalate(rung) => format!("Call {rung}"),
        Action::Respond(response) => {
            let subject = match (&state.envido, &state.truco) {
                (EnvidoStatus::Pending(pending), _) => pending.call.to_string(),
                (_, TrucoStatus::Pending(pending)) => pending.rung.to_string(),
                _ => String::from("call"),
            };
            match response {
                Response::Accept => format!("Accept {subject} (quiero)"),
                Response::Decline => format!("Decline {subject} (no quiero)"),
            }
        }
        Action::PlayCard(card) => format!("Play {card}"),
        Action::Fold => String::from("Fold (me voy al mazo)"),
    }
}

fn describe_envido(status: &EnvidoStatus) -> String {
    match status {
        EnvidoStatus::Open => String::from("not called"),
        EnvidoStatus::Pending(pending) => format!(
            "{} by Player {}, awaiting Player {}",
            pending.call, pending.caller, pending.awaiting
        ),
        EnvidoStatus::Settled(outcome) => {
            let shown = outcome
                .shown
                .map(|[a, b]| format!(" ({a} vs {b})"))
                .unwrap_or_default();
            format!(
                "{} settled, {} point(s) to Player {}{shown}",
                outcome.call, outcome.points, outcome.winner
            )
        }
    }
}

fn describe_truco(status: &TrucoStatus) -> String {
    match status {
        TrucoStatus::NotCalled => String::from("not called"),
        TrucoStatus::Pending(pending) => format!(
            "{} by Player {}, awaiting Player {}",
            pending.rung, pending.caller, pending.awaiting
        ),
        TrucoStatus::Accepted { rung, raise_holder } => {
            format!("{rung} accepted, Player {raise_holder} may raise")
        }
    }
}
