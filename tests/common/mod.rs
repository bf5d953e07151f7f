#![allow(dead_code)]

use blackjack_table::cards::Card;
use blackjack_table::deck::Deck;
use blackjack_table::strategy::BotPolicy;
use blackjack_table::{Table, TableConfig};

/// Deck dealing the named cards in order, e.g. `["10_of_hearts", "14_of_spades"]`.
pub fn stacked(cards: &[&str]) -> Deck {
    Deck::stacked(
        cards
            .iter()
            .map(|name| name.parse::<Card>().expect("valid card name"))
            .collect(),
    )
}

pub fn table(bots: u8) -> Table {
    Table::new(TableConfig {
        deck_count: 1,
        bots,
        bot_policy: BotPolicy::Basic,
        seed: Some(42),
    })
    .expect("valid config")
}
