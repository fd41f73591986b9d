//! Card play: turn order, trick resolution and the hand's card winner.
//!
//! Two trick wins take the hand. A tied trick ("parda") counts for nobody:
//! after an opening parda the next trick won decides, a parda following a single
//! win hands the hand to that winner, and mano takes a parda on the third trick
//! after a 1-1 split as well as a hand of three pardas.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{PLAYER_COUNT, PlayerId, opponent};
use crate::card::{Card, HAND_SIZE};
use crate::error::{GameError, IllegalAction};

pub const MAX_TRICKS: usize = HAND_SIZE;

/// A card together with the player who played it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayedCard {
    pub player: PlayerId,
    pub card: Card,
}

/// Result of a single trick.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrickOutcome {
    Won(PlayerId),
    Parda,
}

#[derive(Clone, Debug)]
pub struct TrickEngine {
    mano: PlayerId,
    to_play: PlayerId,
    hands: [Vec<Card>; PLAYER_COUNT],
    dealt: [Vec<Card>; PLAYER_COUNT],
    played: Vec<PlayedCard>,
    tricks: Vec<TrickOutcome>,
}

impl TrickEngine {
    pub fn new(hands: [Vec<Card>; PLAYER_COUNT], mano: PlayerId) -> Self {
        Self {
            mano,
            to_play: mano,
            dealt: hands.clone(),
            hands,
            played: Vec::with_capacity(HAND_SIZE * PLAYER_COUNT),
            tricks: Vec::with_capacity(MAX_TRICKS),
        }
    }

    pub fn to_play(&self) -> PlayerId {
        self.to_play
    }

    /// Number of completed tricks.
    pub fn round(&self) -> usize {
        self.tricks.len()
    }

    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    /// The three cards the player was dealt, whether played or not.
    pub fn dealt_hand(&self, player: PlayerId) -> &[Card] {
        &self.dealt[player]
    }

    pub fn played(&self) -> &[PlayedCard] {
        &self.played
    }

    pub fn tricks(&self) -> &[TrickOutcome] {
        &self.tricks
    }

    pub fn check_play(&self, player: PlayerId, card: Card) -> Result<(), IllegalAction> {
        if player != self.to_play {
            return Err(IllegalAction::NotPlayersTurn);
        }
        if !self.hands[player].contains(&card) {
            return Err(IllegalAction::CardNotInHand(card));
        }
        Ok(())
    }

    /// Plays `card` for `player`; returns the trick outcome when this card closes a trick.
    pub fn play(
        &mut self,
        player: PlayerId,
        card: Card,
    ) -> Result<Option<TrickOutcome>, IllegalAction> {
        self.check_play(player, card)?;
        let hand = &mut self.hands[player];
        if let Some(index) = hand.iter().position(|held| *held == card) {
            hand.remove(index);
        }
        self.played.push(PlayedCard { player, card });
        self.to_play = opponent(player);
        debug!(player, %card, "card played");
        if self.played.len() % PLAYER_COUNT == 0 {
            Ok(Some(self.resolve_trick()))
        } else {
            Ok(None)
        }
    }

    fn resolve_trick(&mut self) -> TrickOutcome {
        let first = self.played[self.played.len() - 2];
        let second = self.played[self.played.len() - 1];
        let outcome = match second.card.tier().cmp(&first.card.tier()) {
            Ordering::Greater => TrickOutcome::Won(second.player),
            Ordering::Equal => TrickOutcome::Parda,
            Ordering::Less => TrickOutcome::Won(first.player),
        };
        // The second player leads after a win or a parda; otherwise the first keeps the lead.
        self.to_play = match outcome {
            TrickOutcome::Won(winner) => winner,
            TrickOutcome::Parda => second.player,
        };
        self.tricks.push(outcome);
        debug!(round = self.tricks.len(), ?outcome, lead = self.to_play, "trick resolved");
        outcome
    }

    pub fn trick_wins(&self, player: PlayerId) -> usize {
        self.tricks
            .iter()
            .filter(|outcome| **outcome == TrickOutcome::Won(player))
            .count()
    }

    /// Winner of the hand by tricks, once decided.
    pub fn card_winner(&self) -> Option<PlayerId> {
        let mut wins = [0usize; PLAYER_COUNT];
        let mut opened_with_parda = false;
        for outcome in &self.tricks {
            match *outcome {
                TrickOutcome::Won(player) => {
                    wins[player] += 1;
                    if opened_with_parda || wins[player] == 2 {
                        return Some(player);
                    }
                }
                TrickOutcome::Parda => {
                    let (mano, other) = (self.mano, opponent(self.mano));
                    match wins[mano].cmp(&wins[other]) {
                        Ordering::Greater => return Some(mano),
                        Ordering::Less => return Some(other),
                        Ordering::Equal if wins[mano] > 0 => return Some(mano),
                        Ordering::Equal => opened_with_parda = true,
                    }
                }
            }
        }
        (self.tricks.len() == MAX_TRICKS).then_some(self.mano)
    }

    /// Confirms the round counter and hand sizes agree with the played log.
    pub fn check_invariants(&self) -> Result<(), GameError> {
        if self.tricks.len() != self.played.len() / PLAYER_COUNT {
            return Err(GameError::InvariantViolation(
                "round counter out of step with cards played",
            ));
        }
        for player in 0..PLAYER_COUNT {
            let played = self.played.iter().filter(|p| p.player == player).count();
            if self.hands[player].len() + played != self.dealt[player].len() {
                return Err(GameError::InvariantViolation(
                    "hand size out of step with cards played",
                ));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn record_outcome(&mut self, outcome: TrickOutcome) {
        self.tricks.push(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).expect("valid card")
    }

    fn engine() -> TrickEngine {
        TrickEngine::new(
            [
                vec![card(Suit::Espadas, 1), card(Suit::Oros, 4), card(Suit::Copas, 3)],
                vec![card(Suit::Bastos, 3), card(Suit::Oros, 5), card(Suit::Espadas, 3)],
            ],
            0,
        )
    }

    #[test]
    fn out_of_turn_play_is_rejected() {
        let mut tricks = engine();
        let result = tricks.play(1, card(Suit::Bastos, 3));
        assert_eq!(result, Err(IllegalAction::NotPlayersTurn));
        assert_eq!(tricks.hand(1).len(), 3);
        assert!(tricks.played().is_empty());
    }

    #[test]
    fn first_player_keeps_lead_after_winning() {
        let mut tricks = engine();
        assert_eq!(tricks.play(0, card(Suit::Espadas, 1)), Ok(None));
        let outcome = tricks.play(1, card(Suit::Oros, 5)).expect("legal play");
        assert_eq!(outcome, Some(TrickOutcome::Won(0)));
        assert_eq!(tricks.to_play(), 0);
        assert_eq!(tricks.round(), 1);
    }

    #[test]
    fn parda_hands_lead_to_second_player() {
        let mut tricks = engine();
        tricks.play(0, card(Suit::Copas, 3)).expect("legal play");
        let outcome = tricks.play(1, card(Suit::Bastos, 3)).expect("legal play");
        assert_eq!(outcome, Some(TrickOutcome::Parda));
        assert_eq!(tricks.to_play(), 1);
        assert_eq!(tricks.card_winner(), None);
    }

    #[test]
    fn two_tricks_decide_the_hand() {
        let mut tricks = TrickEngine::new(
            [
                vec![card(Suit::Oros, 4), card(Suit::Copas, 5), card(Suit::Bastos, 6)],
                vec![card(Suit::Espadas, 1), card(Suit::Espadas, 7), card(Suit::Bastos, 3)],
            ],
            0,
        );
        tricks.play(0, card(Suit::Oros, 4)).expect("legal play");
        tricks.play(1, card(Suit::Espadas, 1)).expect("legal play");
        assert_eq!(tricks.to_play(), 1);
        assert_eq!(tricks.card_winner(), None);
        tricks.play(1, card(Suit::Espadas, 7)).expect("legal play");
        tricks.play(0, card(Suit::Copas, 5)).expect("legal play");
        assert_eq!(tricks.trick_wins(1), 2);
        assert_eq!(tricks.card_winner(), Some(1));
    }

    #[test]
    fn replaying_a_card_is_rejected() {
        let mut tricks = engine();
        tricks.play(0, card(Suit::Espadas, 1)).expect("legal play");
        tricks.play(1, card(Suit::Oros, 5)).expect("legal play");
        tricks.play(0, card(Suit::Copas, 3)).expect("legal play");
        let result = tricks.play(1, card(Suit::Oros, 5));
        assert_eq!(result, Err(IllegalAction::CardNotInHand(card(Suit::Oros, 5))));
        assert_eq!(tricks.played().len(), 3);
    }

    #[test]
    fn mano_wins_once_opponent_cannot_overtake() {
        let mut tricks = engine();
        tricks.play(0, card(Suit::Espadas, 1)).expect("legal play");
        tricks.play(1, card(Suit::Oros, 5)).expect("legal play");
        tricks.play(0, card(Suit::Oros, 4)).expect("legal play");
        tricks.play(1, card(Suit::Bastos, 3)).expect("legal play");
        // One trick each with one left: undecided.
        assert_eq!(tricks.card_winner(), None);
        tricks.play(1, card(Suit::Espadas, 3)).expect("legal play");
        tricks.play(0, card(Suit::Copas, 3)).expect("legal play");
        // Parda on the deciding trick goes to mano.
        assert_eq!(tricks.tricks().last(), Some(&TrickOutcome::Parda));
        assert_eq!(tricks.card_winner(), Some(0));
        assert!(tricks.check_invariants().is_ok());
    }

    #[test]
    fn early_decision_after_first_trick_win_and_parda_for_mano() {
        let mut tricks = engine();
        tricks.play(0, card(Suit::Espadas, 1)).expect("legal play");
        tricks.play(1, card(Suit::Oros, 5)).expect("legal play");
        tricks.play(0, card(Suit::Copas, 3)).expect("legal play");
        tricks.play(1, card(Suit::Bastos, 3)).expect("legal play");
        // Mano won the first and tied the second: the opponent can at most tie.
        assert_eq!(tricks.card_winner(), Some(0));
    }

    fn settled(mano: PlayerId, outcomes: &[TrickOutcome]) -> Option<PlayerId> {
        let mut tricks = engine();
        tricks.mano = mano;
        for outcome in outcomes {
            tricks.record_outcome(*outcome);
        }
        tricks.card_winner()
    }

    #[test]
    fn opening_parda_goes_to_next_trick_winner() {
        let mut tricks = TrickEngine::new(
            [
                vec![card(Suit::Copas, 3), card(Suit::Oros, 4), card(Suit::Espadas, 1)],
                vec![card(Suit::Bastos, 3), card(Suit::Bastos, 1), card(Suit::Copas, 5)],
            ],
            0,
        );
        tricks.play(0, card(Suit::Copas, 3)).expect("legal play");
        tricks.play(1, card(Suit::Bastos, 3)).expect("legal play");
        assert_eq!(tricks.card_winner(), None);
        tricks.play(1, card(Suit::Bastos, 1)).expect("legal play");
        tricks.play(0, card(Suit::Oros, 4)).expect("legal play");
        assert_eq!(tricks.tricks(), &[TrickOutcome::Parda, TrickOutcome::Won(1)]);
        assert_eq!(tricks.card_winner(), Some(1));
    }

    #[test]
    fn parda_sequences_favour_either_seat() {
        use TrickOutcome::{Parda, Won};
        assert_eq!(settled(0, &[Parda, Won(1)]), Some(1));
        assert_eq!(settled(0, &[Parda, Won(0)]), Some(0));
        assert_eq!(settled(0, &[Won(1), Parda]), Some(1));
        assert_eq!(settled(0, &[Won(0), Parda]), Some(0));
        assert_eq!(settled(1, &[Won(0), Parda]), Some(0));
        assert_eq!(settled(0, &[Parda, Parda, Won(1)]), Some(1));
        assert_eq!(settled(0, &[Parda, Parda]), None);
        assert_eq!(settled(1, &[Parda, Parda, Parda]), Some(1));
    }

    #[test]
    fn split_tricks_then_parda_go_to_mano() {
        use TrickOutcome::{Parda, Won};
        assert_eq!(settled(0, &[Won(1), Won(0), Parda]), Some(0));
        assert_eq!(settled(1, &[Won(1), Won(0), Parda]), Some(1));
        assert_eq!(settled(0, &[Won(1), Won(0)]), None);
        assert_eq!(settled(0, &[Won(1), Won(0), Won(1)]), Some(1));
    }

    #[test]
    fn invariant_check_catches_skewed_round_counter() {
        let mut tricks = engine();
        tricks.record_outcome(TrickOutcome::Parda);
        assert!(matches!(
            tricks.check_invariants(),
            Err(GameError::InvariantViolation(_))
        ));
    }
}
