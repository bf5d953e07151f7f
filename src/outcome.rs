use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hand::BLACKJACK;

/// Result of one participant's hand against the dealer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Blackjack,
    Win,
    WinDealerBust,
    Lose,
    Bust,
    Tie,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Blackjack | Outcome::Win | Outcome::WinDealerBust)
    }

    pub fn is_loss(self) -> bool {
        matches!(self, Outcome::Lose | Outcome::Bust)
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Blackjack => "Blackjack",
            Outcome::Win => "Win",
            Outcome::WinDealerBust => "Win (Dealer Bust)",
            Outcome::Lose => "Lose",
            Outcome::Bust => "Bust",
            Outcome::Tie => "Tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compares final totals. A busted participant loses even if the dealer also busts.
pub fn resolve(dealer_total: u8, total: u8) -> Outcome {
    if total > BLACKJACK {
        Outcome::Bust
    } else if dealer_total > BLACKJACK {
        Outcome::WinDealerBust
    } else if total > dealer_total {
        Outcome::Win
    } else if total < dealer_total {
        Outcome::Lose
    } else {
        Outcome::Tie
    }
}

/// Running win/loss/tie counts for the player across rounds.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        if outcome.is_win() {
            self.wins += 1;
        } else if outcome.is_loss() {
            self.losses += 1;
        } else {
            self.ties += 1;
        }
    }

    pub fn rounds(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dealer_bust_pays_standing_hands() {
        assert_eq!(resolve(22, 15), Outcome::WinDealerBust);
        assert_eq!(resolve(25, 21), Outcome::WinDealerBust);
    }

    #[test]
    fn bust_loses_even_against_dealer_bust() {
        assert_eq!(resolve(22, 23), Outcome::Bust);
        assert_eq!(resolve(17, 22), Outcome::Bust);
    }

    #[test]
    fn compares_totals() {
        assert_eq!(resolve(18, 19), Outcome::Win);
        assert_eq!(resolve(19, 18), Outcome::Lose);
        assert_eq!(resolve(20, 20), Outcome::Tie);
        assert_eq!(resolve(21, 21), Outcome::Tie);
    }

    #[test]
    fn tally_counts_one_bucket_per_outcome() {
        let mut tally = Tally::default();
        tally.record(resolve(22, 15));
        assert_eq!(tally, Tally { wins: 1, losses: 0, ties: 0 });
        tally.record(resolve(20, 20));
        assert_eq!(tally, Tally { wins: 1, losses: 0, ties: 1 });
        tally.record(Outcome::Bust);
        tally.record(Outcome::Blackjack);
        assert_eq!(tally, Tally { wins: 2, losses: 1, ties: 1 });
        assert_eq!(tally.rounds(), 4);
    }

    #[test]
    fn labels() {
        assert_eq!(Outcome::WinDealerBust.to_string(), "Win (Dealer Bust)");
        assert_eq!(Outcome::Tie.label(), "Tie");
    }
}
