use std::collections::{HashMap, HashSet};

use blackjack_table::cards::{Card, Rank, Suit};
use blackjack_table::deck::Deck;
use blackjack_table::GameError;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn drain(deck: &mut Deck) -> Vec<Card> {
    let mut cards = Vec::new();
    while let Ok(card) = deck.draw() {
        cards.push(card);
    }
    cards
}

#[test]
fn single_deck_has_52_unique_cards() {
    let mut deck = Deck::build(1);
    assert_eq!(deck.remaining_cards(), 52);
    let cards = drain(&mut deck);
    let unique: HashSet<Card> = cards.iter().copied().collect();
    assert_eq!(cards.len(), 52);
    assert_eq!(unique.len(), 52);
}

#[test]
fn four_decks_hold_each_card_four_times() {
    let mut deck = Deck::build(4);
    assert_eq!(deck.remaining_cards(), 208);
    let mut counts: HashMap<Card, usize> = HashMap::new();
    for card in drain(&mut deck) {
        *counts.entry(card).or_default() += 1;
    }
    assert_eq!(counts.len(), 52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            assert_eq!(counts[&Card::new(rank, suit)], 4, "{rank:?} of {suit:?}");
        }
    }
}

#[test]
fn empty_deck_reports_error_instead_of_panicking() {
    let mut deck = Deck::build(1);
    drain(&mut deck);
    assert!(deck.is_empty());
    assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    assert_eq!(deck.dealt_cards(), 52);
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut a = Deck::shuffled(1, &mut SmallRng::seed_from_u64(9));
    let mut b = Deck::shuffled(1, &mut SmallRng::seed_from_u64(9));
    assert_eq!(drain(&mut a), drain(&mut b));
}

#[test]
fn shuffle_keeps_every_card() {
    let mut shuffled = Deck::shuffled(2, &mut SmallRng::seed_from_u64(3));
    let mut ordered = Deck::build(2);
    let mut a = drain(&mut shuffled);
    let mut b = drain(&mut ordered);
    assert_ne!(a, b);
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn stacked_deck_deals_in_given_order() {
    let cards = vec![
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::Two, Suit::Hearts),
        Card::new(Rank::King, Suit::Clubs),
    ];
    let mut deck = Deck::stacked(cards.clone());
    assert_eq!(deck.peek_order().copied().collect::<Vec<_>>(), cards);
    assert_eq!(drain(&mut deck), cards);
}
