use thiserror::Error;

use crate::action::PlayerId;
use crate::card::Card;

/// Errors reported when an action cannot be applied to the hand.
///
/// Every variant except [`GameError::InvariantViolation`] leaves the hand untouched,
/// so callers may query the legal actions again and retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("hand is already finished")]
    HandFinished,
    #[error("illegal action: {0}")]
    Illegal(#[from] IllegalAction),
    #[error("action index {0} is not in the action catalog")]
    MalformedAction(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
}

/// Reasons an otherwise well-formed action is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("not the player's turn")]
    NotPlayersTurn,
    #[error("player does not hold {0}")]
    CardNotInHand(Card),
    #[error("a call is awaiting a response")]
    ResponsePending,
    #[error("no call is awaiting this player's response")]
    NothingToAnswer,
    #[error("envido can only be called in the first round")]
    EnvidoAfterFirstRound,
    #[error("envido cannot be called once truco has been called")]
    EnvidoAfterTruco,
    #[error("envido has already been played this hand")]
    EnvidoClosed,
    #[error("truco cannot be called while envido is unresolved")]
    TrucoDuringEnvido,
    #[error("call is out of ladder order")]
    OutOfOrder,
    #[error("player does not hold the right to raise")]
    NoRaiseRight,
    #[error("the ladder has no higher rung")]
    LadderExhausted,
}
