//! Envido: the pre-trick bidding ladder.
//!
//! The ladder itself is pure state. A pending call is handed back to the caller
//! as an [`EnvidoCall`] and only becomes "active" once [`crate::Game`] stores it
//! in its phase; the ladder never activates itself.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::action::{BidCall, PlayerId, opponent};
use crate::card::{Card, envido_points};
use crate::error::IllegalAction;
use crate::score::AwardReason;
use crate::state::RuleSettings;

/// A call waiting for `awaiting` to answer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvidoCall {
    pub call: BidCall,
    /// The call this one raised, if any.
    pub previous: Option<BidCall>,
    pub caller: PlayerId,
    pub awaiting: PlayerId,
}

impl EnvidoCall {
    /// Points the caller collects when the call is turned down.
    pub fn refusal_stake(&self, settings: &RuleSettings) -> u32 {
        self.previous
            .map(|call| settings.envido_stake(call))
            .unwrap_or(settings.envido_refusal)
    }
}

/// How the envido ended.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvidoOutcome {
    pub call: BidCall,
    pub winner: PlayerId,
    pub points: u32,
    pub reason: AwardReason,
    /// Envido points of both seats, shown only when the call was accepted.
    pub shown: Option<[u8; 2]>,
}

/// Envido as seen from outside the hand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnvidoStatus {
    Open,
    Pending(EnvidoCall),
    Settled(EnvidoOutcome),
}

#[derive(Clone, Debug, Default)]
pub struct Envido {
    outcome: Option<EnvidoOutcome>,
}

impl Envido {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the envido has been settled.
    pub fn is_open(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<EnvidoOutcome> {
        self.outcome
    }

    /// Validates an opening call (`pending == None`) or a raise over `pending`.
    pub fn call(
        &self,
        caller: PlayerId,
        call: BidCall,
        pending: Option<&EnvidoCall>,
    ) -> Result<EnvidoCall, IllegalAction> {
        if !self.is_open() {
            return Err(IllegalAction::EnvidoClosed);
        }
        let previous = match pending {
            None => None,
            Some(pending) => {
                if pending.awaiting != caller {
                    return Err(IllegalAction::NotPlayersTurn);
                }
                if call <= pending.call {
                    return Err(IllegalAction::OutOfOrder);
                }
                Some(pending.call)
            }
        };
        Ok(EnvidoCall {
            call,
            previous,
            caller,
            awaiting: opponent(caller),
        })
    }

    /// Compares both dealt hands; mano wins ties.
    pub fn accept(
        &mut self,
        pending: EnvidoCall,
        dealt: [&[Card]; 2],
        mano: PlayerId,
        settings: &RuleSettings,
    ) -> EnvidoOutcome {
        let shown = [envido_points(dealt[0]), envido_points(dealt[1])];
        let challenger = opponent(mano);
        let winner = if shown[challenger] > shown[mano] {
            challenger
        } else {
            mano
        };
        info!(call = %pending.call, mano_points = shown[mano], challenger_points = shown[challenger], winner, "envido shown");
        self.settle(EnvidoOutcome {
            call: pending.call,
            winner,
            points: settings.envido_stake(pending.call),
            reason: AwardReason::EnvidoAccepted,
            shown: Some(shown),
        })
    }

    pub fn decline(&mut self, pending: EnvidoCall, settings: &RuleSettings) -> EnvidoOutcome {
        self.settle(EnvidoOutcome {
            call: pending.call,
            winner: pending.caller,
            points: pending.refusal_stake(settings),
            reason: AwardReason::EnvidoRefused,
            shown: None,
        })
    }

    /// Settles a pending call against `folder`, at the refusal stake.
    pub fn forfeit(
        &mut self,
        pending: EnvidoCall,
        folder: PlayerId,
        settings: &RuleSettings,
    ) -> EnvidoOutcome {
        self.settle(EnvidoOutcome {
            call: pending.call,
            winner: opponent(folder),
            points: pending.refusal_stake(settings),
            reason: AwardReason::EnvidoForfeited,
            shown: None,
        })
    }

    fn settle(&mut self, outcome: EnvidoOutcome) -> EnvidoOutcome {
        self.outcome = Some(outcome);
        outcome
    }
}
