use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::Bot;
use crate::state::HandStateView;

/// Baseline bot that samples uniformly from the legal action set.
///
/// Folding is only chosen when nothing else is legal, otherwise random play
/// would concede most hands on the first move.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, _state: &HandStateView, legal_actions: &[Action]) -> Action {
        let candidates: Vec<Action> = legal_actions
            .iter()
            .copied()
            .filter(|action| *action != Action::Fold)
            .collect();
        candidates
            .choose(&mut self.rng)
            .or_else(|| legal_actions.first())
            .copied()
            .expect("at least one legal action must be available")
    }
}
