use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four suits. Declaration order is the order a fresh deck is built in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Diamonds,
    Clubs,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Clubs, Suit::Hearts, Suit::Spades];

    pub fn name(self) -> &'static str {
        match self {
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
        }
    }
}

/// Card rank, numbered 2 through 14 with the Ace high at 14.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            2..=14 => Some(Rank::ALL[(v - 2) as usize]),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.number()
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Rank::from_u8(v).ok_or_else(|| format!("rank must be between 2 and 14, got {v}"))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    /// Identity used by renderers to look up the card face, e.g. `"14_of_spades"`.
    pub fn asset_name(&self) -> String {
        format!("{}_of_{}", self.rank.number(), self.suit.name())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asset_name())
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rank, suit) = s
            .split_once("_of_")
            .ok_or_else(|| format!("expected '<rank>_of_<suit>', got '{s}'"))?;
        let rank = rank
            .parse::<u8>()
            .map_err(|_| format!("invalid rank in '{s}'"))
            .and_then(Rank::try_from)?;
        let suit = Suit::ALL
            .into_iter()
            .find(|candidate| candidate.name() == suit)
            .ok_or_else(|| format!("invalid suit in '{s}'"))?;
        Ok(Card { rank, suit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_name_uses_numeric_rank() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).asset_name(), "14_of_spades");
        assert_eq!(Card::new(Rank::Jack, Suit::Hearts).asset_name(), "11_of_hearts");
        assert_eq!(Card::new(Rank::Two, Suit::Diamonds).to_string(), "2_of_diamonds");
    }

    #[test]
    fn parses_asset_names() {
        let card: Card = "13_of_clubs".parse().unwrap();
        assert_eq!(card, Card::new(Rank::King, Suit::Clubs));
        assert!("1_of_clubs".parse::<Card>().is_err());
        assert!("10_of_stars".parse::<Card>().is_err());
        assert!("ten of clubs".parse::<Card>().is_err());
    }

    #[test]
    fn rank_bounds() {
        assert_eq!(Rank::from_u8(2), Some(Rank::Two));
        assert_eq!(Rank::from_u8(14), Some(Rank::Ace));
        assert_eq!(Rank::from_u8(1), None);
        assert_eq!(Rank::from_u8(15), None);
    }

    #[test]
    fn serializes_rank_as_number() {
        let json = serde_json::to_string(&Card::new(Rank::Queen, Suit::Hearts)).unwrap();
        assert_eq!(json, r#"{"rank":12,"suit":"hearts"}"#);
    }
}
