use rand::{rngs::SmallRng, Rng};
use serde::{Deserialize, Serialize};

use crate::hand::Hand;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    Hit,
    Stand,
}

/// How a non-dealer participant decides between hitting and standing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotPolicy {
    /// Simplified basic strategy keyed on total and dealer upcard.
    #[default]
    Basic,
    /// Hit below 12, stand from 19, otherwise hit at random with odds set by the upcard.
    Probabilistic,
}

const CHANCE_TO_HIT_WEAK_DEALER: f64 = 0.3;
const CHANCE_TO_HIT_STRONG_DEALER: f64 = 0.6;

impl BotPolicy {
    /// `upcard` is the point value of the dealer's face-up card (Ace counts 11).
    pub fn decide(&self, total: u8, upcard: u8, rng: &mut SmallRng) -> Action {
        match self {
            BotPolicy::Basic => basic_action(total, upcard),
            BotPolicy::Probabilistic => {
                if total < 12 {
                    Action::Hit
                } else if total >= 19 {
                    Action::Stand
                } else {
                    let chance = if upcard <= 6 {
                        CHANCE_TO_HIT_WEAK_DEALER
                    } else {
                        CHANCE_TO_HIT_STRONG_DEALER
                    };
                    if rng.gen_bool(chance) {
                        Action::Hit
                    } else {
                        Action::Stand
                    }
                }
            }
        }
    }

    /// Whether a participant holding `hand` takes another card. Busted and full hands never hit.
    pub fn should_hit(&self, hand: &Hand, upcard: u8, rng: &mut SmallRng) -> bool {
        if hand.is_bust() || hand.is_full() {
            return false;
        }
        self.decide(hand.best_total(), upcard, rng) == Action::Hit
    }
}

fn basic_action(total: u8, upcard: u8) -> Action {
    match total {
        0..=11 => Action::Hit,
        12 if (4..=6).contains(&upcard) => Action::Stand,
        12 => Action::Hit,
        13..=16 if (2..=6).contains(&upcard) => Action::Stand,
        13..=16 => Action::Hit,
        _ => Action::Stand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn basic_table() {
        let mut rng = rng();
        let basic = BotPolicy::Basic;
        assert_eq!(basic.decide(11, 10, &mut rng), Action::Hit);
        assert_eq!(basic.decide(12, 3, &mut rng), Action::Hit);
        assert_eq!(basic.decide(12, 4, &mut rng), Action::Stand);
        assert_eq!(basic.decide(12, 6, &mut rng), Action::Stand);
        assert_eq!(basic.decide(12, 7, &mut rng), Action::Hit);
        assert_eq!(basic.decide(13, 2, &mut rng), Action::Stand);
        assert_eq!(basic.decide(16, 6, &mut rng), Action::Stand);
        assert_eq!(basic.decide(16, 7, &mut rng), Action::Hit);
        assert_eq!(basic.decide(16, 11, &mut rng), Action::Hit);
        assert_eq!(basic.decide(17, 11, &mut rng), Action::Stand);
        assert_eq!(basic.decide(21, 2, &mut rng), Action::Stand);
    }

    #[test]
    fn probabilistic_edges_are_fixed() {
        let mut rng = rng();
        let policy = BotPolicy::Probabilistic;
        for _ in 0..100 {
            assert_eq!(policy.decide(11, 2, &mut rng), Action::Hit);
            assert_eq!(policy.decide(19, 11, &mut rng), Action::Stand);
        }
    }

    #[test]
    fn probabilistic_middle_follows_upcard_odds() {
        let mut rng = rng();
        let policy = BotPolicy::Probabilistic;
        let trials = 10_000;
        let weak = (0..trials)
            .filter(|_| policy.decide(15, 5, &mut rng) == Action::Hit)
            .count();
        let strong = (0..trials)
            .filter(|_| policy.decide(15, 10, &mut rng) == Action::Hit)
            .count();
        assert!((2_500..3_500).contains(&weak), "weak dealer hits: {weak}");
        assert!((5_500..6_500).contains(&strong), "strong dealer hits: {strong}");
    }

    #[test]
    fn policy_names() {
        let policy: BotPolicy = serde_json::from_str(r#""probabilistic""#).unwrap();
        assert_eq!(policy, BotPolicy::Probabilistic);
        assert_eq!(BotPolicy::default(), BotPolicy::Basic);
    }
}
