use crate::action::{Action, BidCall, Response};
use crate::bot::Bot;
use crate::card::{Card, envido_points};
use crate::envido::EnvidoStatus;
use crate::state::HandStateView;
use crate::tricks::TrickOutcome;
use crate::truco::TrucoStatus;

/// Rule-based bot that plays sensible truco without search or learning.
///
/// In plain English:
/// - Envido: open with a strong count, accept a call when the count clears a
///   threshold, raise when it is very high.
/// - Truco: call with a top card in hand, accept when the remaining cards (plus
///   tricks already won) look strong enough, otherwise decline.
/// - Cards: when answering a trick, win it as cheaply as possible or throw the
///   weakest card; when leading, lead the strongest card.
/// - Never fold while something else is legal.
pub struct HeuristicBot {
    pub open_envido_at: u8,
    pub accept_envido_at: u8,
    pub raise_envido_at: u8,
    pub call_truco_tier: u8,
    pub accept_truco_strength: u32,
}

impl Default for HeuristicBot {
    fn default() -> Self {
        Self {
            open_envido_at: 28,
            accept_envido_at: 26,
            raise_envido_at: 31,
            call_truco_tier: 12,
            accept_truco_strength: 18,
        }
    }
}

impl HeuristicBot {
    pub fn new() -> Self {
        Self::default()
    }

    fn dealt_hand(state: &HandStateView) -> Vec<Card> {
        let mut cards = state.hand.clone();
        cards.extend(
            state
                .cards_played
                .iter()
                .filter(|played| played.player == state.self_player)
                .map(|played| played.card),
        );
        cards
    }

    /// Rough strength of what is left to play: the two best tiers still held,
    /// plus a bonus per trick already won.
    fn truco_strength(state: &HandStateView) -> u32 {
        let mut tiers: Vec<u32> = state.hand.iter().map(|card| card.tier() as u32).collect();
        tiers.sort_unstable_by(|a, b| b.cmp(a));
        let held: u32 = tiers.iter().take(2).sum();
        let won = state
            .tricks
            .iter()
            .filter(|outcome| **outcome == TrickOutcome::Won(state.self_player))
            .count() as u32;
        held + won * 10
    }

    /// Card on the table this player has to answer, if any.
    fn card_to_beat(state: &HandStateView) -> Option<Card> {
        if state.cards_played.len() % 2 == 1 {
            state.cards_played.last().map(|played| played.card)
        } else {
            None
        }
    }

    fn choose_card(state: &HandStateView, legal_actions: &[Action]) -> Option<Action> {
        let mut cards: Vec<Card> = legal_actions.iter().filter_map(Action::card).collect();
        if cards.is_empty() {
            return None;
        }
        cards.sort_by_key(|card| card.tier());
        let pick = match Self::card_to_beat(state) {
            Some(target) => cards
                .iter()
                .copied()
                .find(|card| card.tier() > target.tier())
                .unwrap_or(cards[0]),
            None => cards[cards.len() - 1],
        };
        Some(Action::PlayCard(pick))
    }

    fn highest_bid(legal_actions: &[Action]) -> Option<Action> {
        legal_actions
            .iter()
            .copied()
            .filter(|action| matches!(action, Action::Bid(_)))
            .max_by_key(|action| match action {
                Action::Bid(call) => call.level(),
                _ => 0,
            })
    }

    fn escalation(legal_actions: &[Action]) -> Option<Action> {
        legal_actions
            .iter()
            .copied()
            .find(|action| matches!(action, Action::Escalate(_)))
    }
}

impl Bot for HeuristicBot {
    fn select_action(&mut self, state: &HandStateView, legal_actions: &[Action]) -> Action {
        let envido = envido_points(&Self::dealt_hand(state));
        let accept = Action::Respond(Response::Accept);
        let decline = Action::Respond(Response::Decline);

        if matches!(state.envido, EnvidoStatus::Pending(pending) if pending.awaiting == state.self_player)
        {
            if envido >= self.raise_envido_at {
                if let Some(raise) = Self::highest_bid(legal_actions) {
                    return raise;
                }
            }
            return if envido >= self.accept_envido_at {
                accept
            } else {
                decline
            };
        }

        if matches!(state.truco, TrucoStatus::Pending(pending) if pending.awaiting == state.self_player)
        {
            let strength = Self::truco_strength(state);
            if strength >= self.accept_truco_strength + 6 {
                if let Some(raise) = Self::escalation(legal_actions) {
                    return raise;
                }
            }
            return if strength >= self.accept_truco_strength {
                accept
            } else {
                decline
            };
        }

        if envido >= self.open_envido_at
            && legal_actions.contains(&Action::Bid(BidCall::Envido))
        {
            return Action::Bid(BidCall::Envido);
        }

        let best_tier = state.hand.iter().map(Card::tier).max().unwrap_or(0);
        if best_tier >= self.call_truco_tier {
            if let Some(call) = Self::escalation(legal_actions) {
                return call;
            }
        }

        Self::choose_card(state, legal_actions)
            .or_else(|| {
                legal_actions
                    .iter()
                    .copied()
                    .find(|action| *action != Action::Fold)
            })
            .or_else(|| legal_actions.first().copied())
            .expect("at least one legal action must be available")
    }
}
