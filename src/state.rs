use serde::{Deserialize, Serialize};

use crate::action::{BidCall, PlayerId, Rung};
use crate::card::Card;
use crate::envido::EnvidoStatus;
use crate::error::GameError;
use crate::score::{Award, Scoreboard};
use crate::tricks::{PlayedCard, TrickOutcome};
use crate::truco::TrucoStatus;

/// Point values used by both betting ladders.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSettings {
    /// Value of a hand when truco was never accepted.
    pub hand_value: u32,
    /// Truco, retruco and vale cuatro values.
    pub truco_stakes: [u32; 3],
    /// Envido, real envido and falta envido values.
    pub envido_stakes: [u32; 3],
    /// Paid to the caller when a first envido call is turned down.
    pub envido_refusal: u32,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            hand_value: 1,
            truco_stakes: [2, 3, 4],
            envido_stakes: [2, 3, 5],
            envido_refusal: 1,
        }
    }
}

impl RuleSettings {
    pub fn new(
        hand_value: u32,
        truco_stakes: [u32; 3],
        envido_stakes: [u32; 3],
        envido_refusal: u32,
    ) -> Result<Self, GameError> {
        let settings = Self {
            hand_value,
            truco_stakes,
            envido_stakes,
            envido_refusal,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.hand_value == 0 {
            return Err(GameError::InvalidConfiguration("hand value must be positive"));
        }
        if !strictly_increasing(self.hand_value, &self.truco_stakes) {
            return Err(GameError::InvalidConfiguration(
                "truco stakes must increase strictly above the hand value",
            ));
        }
        if !strictly_increasing(self.envido_refusal, &self.envido_stakes) {
            return Err(GameError::InvalidConfiguration(
                "envido stakes must increase strictly above the refusal value",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn truco_stake(&self, rung: Rung) -> u32 {
        self.truco_stakes[rung.level()]
    }

    #[inline]
    pub fn envido_stake(&self, call: BidCall) -> u32 {
        self.envido_stakes[call.level()]
    }
}

fn strictly_increasing(floor: u32, ladder: &[u32]) -> bool {
    let mut previous = floor;
    for value in ladder {
        if *value <= previous {
            return false;
        }
        previous = *value;
    }
    true
}

/// Status of the hand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandStatus {
    Ongoing,
    /// `winner` is whoever collected the hand's points; `None` when the hand was aborted.
    Finished { winner: Option<PlayerId> },
}

/// Hand snapshot tailored for bots and external agents.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandStateView {
    pub settings: RuleSettings,
    pub status: HandStatus,
    pub self_player: PlayerId,
    pub mano: PlayerId,
    pub turn_holder: PlayerId,
    pub round: usize,
    pub hand: Vec<Card>,
    pub opponent_hand_size: usize,
    pub cards_played: Vec<PlayedCard>,
    pub tricks: Vec<TrickOutcome>,
    pub envido: EnvidoStatus,
    pub truco: TrucoStatus,
    pub scoreboard: Scoreboard,
    pub awards: Vec<Award>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(RuleSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_flat_truco_ladder() {
        let result = RuleSettings::new(1, [2, 2, 4], [2, 3, 5], 1);
        assert!(matches!(result, Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_truco_below_hand_value() {
        let result = RuleSettings::new(2, [2, 3, 4], [2, 3, 5], 1);
        assert!(matches!(result, Err(GameError::InvalidConfiguration(_))));
    }

    #[test]
    fn accepts_cumulative_style_envido_ladder() {
        let settings = RuleSettings::new(1, [2, 3, 4], [2, 5, 15], 1).expect("valid settings");
        assert_eq!(settings.envido_stake(BidCall::FaltaEnvido), 15);
        assert_eq!(settings.truco_stake(Rung::Retruco), 3);
    }
}
