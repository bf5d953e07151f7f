use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

pub const BLACKJACK: u8 = 21;
pub const HAND_LIMIT: usize = 5;

pub fn rank_value(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 11,
        Rank::Jack | Rank::Queen | Rank::King => 10,
        other => other.number(),
    }
}

/// Best total for a set of ranks and whether an Ace is still counted as 11.
///
/// Aces start at 11 and are demoted to 1 one at a time, only while the total is
/// over 21. The returned total may still exceed 21, which is a bust.
pub fn hand_value(ranks: &[Rank]) -> (u8, bool) {
    let mut total: u32 = 0;
    let mut aces = 0;

    for &rank in ranks {
        total += rank_value(rank) as u32;
        if rank.is_ace() {
            aces += 1;
        }
    }

    while total > BLACKJACK as u32 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total.min(u8::MAX as u32) as u8, aces > 0)
}

pub fn best_total(ranks: &[Rank]) -> u8 {
    hand_value(ranks).0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Hand { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() >= HAND_LIMIT
    }

    /// Adds a card unless the hand is already at the card limit.
    #[must_use]
    pub fn push(&mut self, card: Card) -> bool {
        if self.is_full() {
            return false;
        }
        self.cards.push(card);
        true
    }

    fn ranks(&self) -> Vec<Rank> {
        self.cards.iter().map(|card| card.rank).collect()
    }

    pub fn value(&self) -> (u8, bool) {
        hand_value(&self.ranks())
    }

    pub fn best_total(&self) -> u8 {
        self.value().0
    }

    pub fn is_soft(&self) -> bool {
        self.value().1
    }

    pub fn is_bust(&self) -> bool {
        self.best_total() > BLACKJACK
    }

    /// Two cards totalling 21.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.best_total() == BLACKJACK
    }

    /// Per-card point values after Ace demotion, earliest Aces demoted first.
    pub fn card_values(&self) -> Vec<u8> {
        let mut values: Vec<u8> = self.cards.iter().map(|card| rank_value(card.rank)).collect();
        let mut total: u32 = values.iter().map(|&v| v as u32).sum();
        for value in values.iter_mut() {
            if total <= BLACKJACK as u32 {
                break;
            }
            if *value == 11 {
                *value = 1;
                total -= 10;
            }
        }
        values
    }
}
