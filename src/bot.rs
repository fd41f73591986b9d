use crate::action::Action;
use crate::state::HandStateView;

/// Interface for anything that picks truco actions: bots, humans, agents.
///
/// Implementations receive the non-empty legal set for the acting player and must
/// return one of its members.
pub trait Bot {
    fn select_action(&mut self, state: &HandStateView, legal_actions: &[Action]) -> Action;
}
