use crate::action::{Action, BidCall, Response, Rung};
use crate::card::{Card, DECK_SIZE};

pub const BID_ACTIONS: usize = BidCall::ALL.len();
pub const ESCALATE_ACTIONS: usize = Rung::ALL.len();
pub const RESPONSE_ACTIONS: usize = 2;
pub const CARD_ACTIONS: usize = DECK_SIZE;
pub const FOLD_ACTIONS: usize = 1;

pub const BID_OFFSET: usize = 0;
pub const ESCALATE_OFFSET: usize = BID_OFFSET + BID_ACTIONS;
pub const RESPONSE_OFFSET: usize = ESCALATE_OFFSET + ESCALATE_ACTIONS;
pub const CARD_OFFSET: usize = RESPONSE_OFFSET + RESPONSE_ACTIONS;
pub const FOLD_INDEX: usize = CARD_OFFSET + CARD_ACTIONS;
pub const MAX_ACTIONS: usize = FOLD_INDEX + FOLD_ACTIONS;

/// Stable index catalog over every action, for agents that pick actions by number.
pub struct ActionSpace;

impl ActionSpace {
    pub const MAX: usize = MAX_ACTIONS;

    pub fn action_index(action: &Action) -> usize {
        match action {
            Action::Bid(call) => BID_OFFSET + call.level(),
            Action::Escalate(rung) => ESCALATE_OFFSET + rung.level(),
            Action::Respond(Response::Accept) => RESPONSE_OFFSET,
            Action::Respond(Response::Decline) => RESPONSE_OFFSET + 1,
            Action::PlayCard(card) => CARD_OFFSET + card.deck_index(),
            Action::Fold => FOLD_INDEX,
        }
    }

    pub fn index_to_action(index: usize) -> Option<Action> {
        if index < ESCALATE_OFFSET {
            return BidCall::ALL.get(index - BID_OFFSET).copied().map(Action::Bid);
        }
        if index < RESPONSE_OFFSET {
            return Rung::ALL
                .get(index - ESCALATE_OFFSET)
                .copied()
                .map(Action::Escalate);
        }
        if index < CARD_OFFSET {
            let response = if index == RESPONSE_OFFSET {
                Response::Accept
            } else {
                Response::Decline
            };
            return Some(Action::Respond(response));
        }
        if index < FOLD_INDEX {
            return Card::from_deck_index(index - CARD_OFFSET).map(Action::PlayCard);
        }
        if index == FOLD_INDEX {
            Some(Action::Fold)
        } else {
            None
        }
    }

    /// Legality mask over the catalog: `true` where the action is in `legal`.
    pub fn mask(legal: &[Action]) -> [bool; MAX_ACTIONS] {
        let mut mask = [false; MAX_ACTIONS];
        for action in legal {
            mask[Self::action_index(action)] = true;
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    #[test]
    fn every_index_maps_to_a_distinct_action() {
        for index in 0..MAX_ACTIONS {
            let action = ActionSpace::index_to_action(index).expect("index in catalog");
            assert_eq!(ActionSpace::action_index(&action), index);
        }
        assert_eq!(ActionSpace::index_to_action(MAX_ACTIONS), None);
    }

    #[test]
    fn catalog_layout_is_fixed() {
        assert_eq!(MAX_ACTIONS, 49);
        assert_eq!(ActionSpace::index_to_action(0), Some(Action::Bid(BidCall::Envido)));
        assert_eq!(
            ActionSpace::index_to_action(3),
            Some(Action::Escalate(Rung::Truco))
        );
        assert_eq!(
            ActionSpace::index_to_action(7),
            Some(Action::Respond(Response::Decline))
        );
        let ace = Card::new(Suit::Espadas, 1).expect("valid card");
        assert_eq!(ActionSpace::index_to_action(8), Some(Action::PlayCard(ace)));
        assert_eq!(ActionSpace::index_to_action(48), Some(Action::Fold));
    }

    #[test]
    fn mask_marks_only_legal_actions() {
        let legal = [Action::Fold, Action::Respond(Response::Accept)];
        let mask = ActionSpace::mask(&legal);
        assert_eq!(mask.iter().filter(|set| **set).count(), 2);
        assert!(mask[FOLD_INDEX]);
        assert!(mask[RESPONSE_OFFSET]);
    }
}
