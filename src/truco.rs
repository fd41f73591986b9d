//! Truco: the escalating stake on the hand.

use serde::{Deserialize, Serialize};

use crate::action::{PlayerId, Rung, opponent};
use crate::error::IllegalAction;
use crate::state::RuleSettings;

/// A truco call waiting for `awaiting` to answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrucoCall {
    pub rung: Rung,
    pub caller: PlayerId,
    pub awaiting: PlayerId,
}

/// Truco as seen from outside the hand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrucoStatus {
    NotCalled,
    Pending(TrucoCall),
    /// `raise_holder` is the only player allowed to call the next rung.
    Accepted { rung: Rung, raise_holder: PlayerId },
}

/// Accepted rungs of the hand; pending calls live in the game phase.
#[derive(Clone, Debug, Default)]
pub struct Truco {
    accepted: Option<Rung>,
    raise_holder: Option<PlayerId>,
}

impl Truco {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(&self) -> Option<Rung> {
        self.accepted
    }

    pub fn raise_holder(&self) -> Option<PlayerId> {
        self.raise_holder
    }

    /// Value of the hand at the last accepted rung.
    pub fn stake(&self, settings: &RuleSettings) -> u32 {
        self.accepted
            .map(|rung| settings.truco_stake(rung))
            .unwrap_or(settings.hand_value)
    }

    /// The rung a new call has to name, if the ladder is not exhausted.
    pub fn next_rung(&self) -> Option<Rung> {
        match self.accepted {
            None => Some(Rung::Truco),
            Some(rung) => rung.next(),
        }
    }

    /// Validates a call. Without a pending call the caller must be `to_play` and hold
    /// the raise right; with one, only the awaited player may raise it.
    pub fn call(
        &self,
        caller: PlayerId,
        rung: Rung,
        pending: Option<&TrucoCall>,
        to_play: PlayerId,
    ) -> Result<TrucoCall, IllegalAction> {
        let expected = match pending {
            Some(pending) => {
                if pending.awaiting != caller {
                    return Err(IllegalAction::NotPlayersTurn);
                }
                pending.rung.next()
            }
            None => {
                if self.raise_holder.is_some_and(|holder| holder != caller) {
                    return Err(IllegalAction::NoRaiseRight);
                }
                if caller != to_play {
                    return Err(IllegalAction::NotPlayersTurn);
                }
                self.next_rung()
            }
        };
        match expected {
            None => Err(IllegalAction::LadderExhausted),
            Some(expected) if expected != rung => Err(IllegalAction::OutOfOrder),
            Some(_) => Ok(TrucoCall {
                rung,
                caller,
                awaiting: opponent(caller),
            }),
        }
    }

    /// Locks in the pending rung; the accepting player holds the next raise.
    pub fn accept(&mut self, pending: TrucoCall) {
        self.accepted = Some(pending.rung);
        self.raise_holder = Some(pending.awaiting);
    }

    /// Refusing pays the caller the last accepted value, never the refused rung.
    pub fn decline(&self, pending: TrucoCall, settings: &RuleSettings) -> (PlayerId, u32) {
        (pending.caller, self.stake(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_must_be_truco_on_own_turn() {
        let truco = Truco::new();
        assert_eq!(
            truco.call(0, Rung::Retruco, None, 0),
            Err(IllegalAction::OutOfOrder)
        );
        assert_eq!(
            truco.call(1, Rung::Truco, None, 0),
            Err(IllegalAction::NotPlayersTurn)
        );
        let call = truco.call(0, Rung::Truco, None, 0).expect("truco");
        assert_eq!(call.awaiting, 1);
    }

    #[test]
    fn accepting_player_holds_the_raise() {
        let mut truco = Truco::new();
        let call = truco.call(0, Rung::Truco, None, 0).expect("truco");
        truco.accept(call);
        assert_eq!(truco.raise_holder(), Some(1));
        assert_eq!(
            truco.call(0, Rung::Retruco, None, 0),
            Err(IllegalAction::NoRaiseRight)
        );
        let raise = truco.call(1, Rung::Retruco, None, 1).expect("retruco");
        assert_eq!(raise.awaiting, 0);
    }

    #[test]
    fn decline_pays_previous_rung() {
        let settings = RuleSettings::default();
        let mut truco = Truco::new();
        let call = truco.call(0, Rung::Truco, None, 0).expect("truco");
        assert_eq!(truco.decline(call, &settings), (0, 1));
        truco.accept(call);
        let raise = truco.call(1, Rung::Retruco, None, 1).expect("retruco");
        assert_eq!(truco.decline(raise, &settings), (1, 2));
    }

    #[test]
    fn ladder_stops_at_vale_cuatro() {
        let settings = RuleSettings::default();
        let mut truco = Truco::new();
        for (caller, rung) in [(0, Rung::Truco), (1, Rung::Retruco), (0, Rung::ValeCuatro)] {
            let call = truco.call(caller, rung, None, caller).expect("climb");
            truco.accept(call);
        }
        assert_eq!(truco.stake(&settings), 4);
        assert_eq!(truco.next_rung(), None);
        assert_eq!(
            truco.call(1, Rung::ValeCuatro, None, 1),
            Err(IllegalAction::LadderExhausted)
        );
    }

    #[test]
    fn pending_call_can_be_raised_by_awaited_player_only() {
        let truco = Truco::new();
        let call = truco.call(0, Rung::Truco, None, 0).expect("truco");
        assert_eq!(
            truco.call(0, Rung::Retruco, Some(&call), 0),
            Err(IllegalAction::NotPlayersTurn)
        );
        let raise = truco.call(1, Rung::Retruco, Some(&call), 0).expect("raise");
        assert_eq!(raise.caller, 1);
    }
}
