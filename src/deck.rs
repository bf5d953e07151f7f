use rand::{rngs::SmallRng, seq::SliceRandom};
use tracing::warn;

use crate::{
    cards::{Card, Rank, Suit},
    errors::GameError,
};

pub const CARDS_PER_DECK: usize = 52;

/// Remaining cards of one round's shoe. Cards are drawn from the back of `cards`.
#[derive(Debug, Clone)]
pub struct Deck {
    pub num_decks: u8,
    cards: Vec<Card>,
    dealt: usize,
}

impl Deck {
    /// `num_decks` copies of a standard 52-card deck, in build order.
    pub fn build(num_decks: u8) -> Self {
        let mut cards = Vec::with_capacity(num_decks as usize * CARDS_PER_DECK);
        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        // build order is the draw order
        cards.reverse();
        Deck {
            num_decks,
            cards,
            dealt: 0,
        }
    }

    pub fn shuffled(num_decks: u8, rng: &mut SmallRng) -> Self {
        let mut deck = Deck::build(num_decks);
        deck.shuffle(rng);
        deck
    }

    /// A deck that deals `cards` in the given order. Used to replay rounds.
    pub fn stacked(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Deck {
            num_decks: cards.len().div_ceil(CARDS_PER_DECK) as u8,
            cards,
            dealt: 0,
        }
    }

    pub fn shuffle(&mut self, rng: &mut SmallRng) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        match self.cards.pop() {
            Some(card) => {
                self.dealt += 1;
                Ok(card)
            }
            None => {
                warn!(dealt = self.dealt, "draw from empty deck");
                Err(GameError::EmptyDeck)
            }
        }
    }

    pub fn remaining_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn dealt_cards(&self) -> usize {
        self.dealt
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards still to be dealt, next card first.
    pub fn peek_order(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().rev()
    }
}
