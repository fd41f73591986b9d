//! Score keeping for a table of two.
//!
//! The scoreboard outlives a single hand: build the next hand with
//! [`crate::GameBuilder::with_scoreboard`] to carry the totals forward.

use serde::{Deserialize, Serialize};

use crate::action::{PLAYER_COUNT, PlayerId};

/// Why points were handed out.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AwardReason {
    EnvidoAccepted,
    EnvidoRefused,
    EnvidoForfeited,
    TrucoRefused,
    Tricks,
    Fold,
}

/// A single score change applied during a hand.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Award {
    pub player: PlayerId,
    pub points: u32,
    pub reason: AwardReason,
}

/// Ordered (player, cumulative points) rows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreboard {
    rows: [(PlayerId, u32); PLAYER_COUNT],
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            rows: [(0, 0), (1, 0)],
        }
    }

    /// Adds `points` to the row of `player`; unknown players are ignored.
    pub fn add(&mut self, player: PlayerId, points: u32) {
        if let Some(row) = self.rows.iter_mut().find(|(id, _)| *id == player) {
            row.1 += points;
        }
    }

    pub fn points(&self, player: PlayerId) -> u32 {
        self.rows
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, points)| *points)
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &[(PlayerId, u32)] {
        &self.rows
    }

    pub fn total(&self) -> u32 {
        self.rows.iter().map(|(_, points)| points).sum()
    }

    /// First player at or above `target`, if any.
    pub fn reached(&self, target: u32) -> Option<PlayerId> {
        self.rows
            .iter()
            .filter(|(_, points)| *points >= target)
            .max_by_key(|(_, points)| *points)
            .map(|(id, _)| *id)
    }
}
