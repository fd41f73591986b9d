use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Zero-based seat of a player within the hand (0 or 1).
pub type PlayerId = usize;

pub const PLAYER_COUNT: usize = 2;

/// The other seat at the table.
#[inline]
pub fn opponent(player: PlayerId) -> PlayerId {
    1 - player
}

/// Calls on the envido ladder, weakest first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum BidCall {
    Envido,
    RealEnvido,
    FaltaEnvido,
}

impl BidCall {
    pub const ALL: [BidCall; 3] = [BidCall::Envido, BidCall::RealEnvido, BidCall::FaltaEnvido];

    pub fn level(self) -> usize {
        match self {
            BidCall::Envido => 0,
            BidCall::RealEnvido => 1,
            BidCall::FaltaEnvido => 2,
        }
    }
}

/// Rungs of the truco ladder.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Rung {
    Truco,
    Retruco,
    ValeCuatro,
}

impl Rung {
    pub const ALL: [Rung; 3] = [Rung::Truco, Rung::Retruco, Rung::ValeCuatro];

    pub fn level(self) -> usize {
        match self {
            Rung::Truco => 0,
            Rung::Retruco => 1,
            Rung::ValeCuatro => 2,
        }
    }

    /// The rung above this one, if the ladder is not exhausted.
    pub fn next(self) -> Option<Rung> {
        match self {
            Rung::Truco => Some(Rung::Retruco),
            Rung::Retruco => Some(Rung::ValeCuatro),
            Rung::ValeCuatro => None,
        }
    }
}

/// Answer to a pending envido or truco call.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Response {
    Accept,
    Decline,
}

/// Action a player may submit to the hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Open or raise the envido bidding.
    Bid(BidCall),
    /// Call or raise truco.
    Escalate(Rung),
    /// Answer whichever call is awaiting this player.
    Respond(Response),
    /// Play a card from the hand into the current trick.
    PlayCard(Card),
    /// Concede the pending bidding, or the whole hand.
    Fold,
}

impl Action {
    /// Returns the played card if the action is a card play.
    pub fn card(&self) -> Option<Card> {
        match self {
            Action::PlayCard(card) => Some(*card),
            _ => None,
        }
    }
}

impl fmt::Display for BidCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BidCall::Envido => "envido",
            BidCall::RealEnvido => "real envido",
            BidCall::FaltaEnvido => "falta envido",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rung::Truco => "truco",
            Rung::Retruco => "retruco",
            Rung::ValeCuatro => "vale cuatro",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bid(call) => write!(f, "{call}"),
            Action::Escalate(rung) => write!(f, "{rung}"),
            Action::Respond(Response::Accept) => f.write_str("quiero"),
            Action::Respond(Response::Decline) => f.write_str("no quiero"),
            Action::PlayCard(card) => write!(f, "play {card}"),
            Action::Fold => f.write_str("fold"),
        }
    }
}
