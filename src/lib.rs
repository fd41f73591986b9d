//! Rules engine for two-player Argentine truco: envido bidding, truco escalation
//! and trick play, dispatched through a single hand controller.

pub mod action;
pub mod action_space;
pub mod bot;
pub mod bots;
pub mod card;
pub mod envido;
pub mod error;
pub mod game;
pub mod score;
pub mod state;
pub mod tricks;
pub mod truco;
pub mod visualize;

pub use crate::action::{Action, BidCall, PLAYER_COUNT, PlayerId, Response, Rung, opponent};
pub use crate::action_space::ActionSpace;
pub use crate::bot::Bot;
pub use crate::bots::{HeuristicBot, HumanBot, RandomBot, create_bot_from_spec, label_for_spec};
pub use crate::card::{Card, Suit, envido_points, full_deck};
pub use crate::envido::{EnvidoCall, EnvidoOutcome, EnvidoStatus};
pub use crate::error::{GameError, IllegalAction};
pub use crate::game::{ActivePhase, Game, GameBuilder, GameConfig};
pub use crate::score::{Award, AwardReason, Scoreboard};
pub use crate::state::{HandStateView, HandStatus, RuleSettings};
pub use crate::tricks::{PlayedCard, TrickOutcome};
pub use crate::truco::{TrucoCall, TrucoStatus};
pub use crate::visualize::{VisualOptions, describe_action, render_state};
