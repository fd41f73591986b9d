use std::fmt;

use serde::{Deserialize, Serialize};

pub const HAND_SIZE: usize = 3;
pub const DECK_SIZE: usize = 40;
pub const RANKS: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 10, 11, 12];

/// The four suits of the Spanish deck.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Espadas,
    Bastos,
    Oros,
    Copas,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Espadas, Suit::Bastos, Suit::Oros, Suit::Copas];

    pub fn index(self) -> usize {
        match self {
            Suit::Espadas => 0,
            Suit::Bastos => 1,
            Suit::Oros => 2,
            Suit::Copas => 3,
        }
    }
}

/// A card of the 40-card Spanish deck. Only deck ranks can be constructed, so
/// every card has a slot in [`full_deck`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    suit: Suit,
    rank: u8,
}

#[derive(Deserialize)]
struct RawCard {
    suit: Suit,
    rank: u8,
}

impl TryFrom<RawCard> for Card {
    type Error = String;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::new(raw.suit, raw.rank)
            .ok_or_else(|| format!("rank {} is not in the Spanish deck", raw.rank))
    }
}

impl Card {
    /// Creates a card, returning `None` for ranks absent from the deck (8, 9, 0, >12).
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        RANKS.contains(&rank).then_some(Self { suit, rank })
    }

    #[cfg(test)]
    pub(crate) fn unchecked(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Trick strength, 14 for the ace of espadas down to 1 for the fours.
    pub fn tier(&self) -> u8 {
        match (self.rank, self.suit) {
            (1, Suit::Espadas) => 14,
            (1, Suit::Bastos) => 13,
            (7, Suit::Espadas) => 12,
            (7, Suit::Oros) => 11,
            (3, _) => 10,
            (2, _) => 9,
            (1, _) => 8,
            (12, _) => 7,
            (11, _) => 6,
            (10, _) => 5,
            (7, _) => 4,
            (6, _) => 3,
            (5, _) => 2,
            _ => 1,
        }
    }

    /// Value of the card when counting envido; face cards count nothing.
    #[inline]
    pub fn envido_value(&self) -> u8 {
        if self.rank >= 10 { 0 } else { self.rank }
    }

    /// Position of the card in [`full_deck`] order.
    pub fn deck_index(&self) -> usize {
        let rank_index = RANKS
            .iter()
            .position(|rank| *rank == self.rank)
            .unwrap_or_default();
        self.suit.index() * RANKS.len() + rank_index
    }

    pub fn from_deck_index(index: usize) -> Option<Self> {
        if index >= DECK_SIZE {
            return None;
        }
        let suit = Suit::ALL[index / RANKS.len()];
        let rank = RANKS[index % RANKS.len()];
        Some(Self { suit, rank })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self.suit {
            Suit::Espadas => "espadas",
            Suit::Bastos => "bastos",
            Suit::Oros => "oros",
            Suit::Copas => "copas",
        };
        write!(f, "{} de {suit}", self.rank)
    }
}

/// Builds the 40-card deck in deterministic order (unshuffled), grouped by suit.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in RANKS {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Envido points of a dealt hand.
///
/// Two or more cards of one suit score 20 plus the two best envido values of that
/// suit; otherwise the hand is worth its best single envido value.
pub fn envido_points(cards: &[Card]) -> u8 {
    let mut best = cards.iter().map(Card::envido_value).max().unwrap_or(0);
    for suit in Suit::ALL {
        let mut values: Vec<u8> = cards
            .iter()
            .filter(|card| card.suit == suit)
            .map(Card::envido_value)
            .collect();
        if values.len() < 2 {
            continue;
        }
        values.sort_unstable_by(|a, b| b.cmp(a));
        best = best.max(20 + values[0] + values[1]);
    }
    best
}
