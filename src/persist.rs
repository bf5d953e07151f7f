use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    errors::GameError,
    game::{ParticipantId, Round},
    hand::HAND_LIMIT,
    outcome::Tally,
    table::MAX_BOTS,
};

/// Point values held by one participant, Aces already demoted where needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedHand {
    pub id: ParticipantId,
    pub card_values: Vec<u8>,
}

impl SavedHand {
    pub fn total(&self) -> u32 {
        self.card_values.iter().map(|&v| v as u32).sum()
    }
}

/// Flat save record: the tally plus each participant's card values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    #[serde(flatten)]
    pub tally: Tally,
    #[serde(default)]
    pub participants: Vec<SavedHand>,
}

impl SavedGame {
    pub fn capture(tally: Tally, round: Option<&Round>, restored: &[SavedHand]) -> Self {
        let participants = match round {
            Some(round) => round
                .participants()
                .iter()
                .map(|p| SavedHand {
                    id: p.id,
                    card_values: p.hand.card_values(),
                })
                .collect(),
            None => restored.to_vec(),
        };
        SavedGame { tally, participants }
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string(self).map_err(|err| GameError::MalformedSave(err.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let saved: SavedGame =
            serde_json::from_str(json).map_err(|err| GameError::MalformedSave(err.to_string()))?;
        saved.validate()?;
        Ok(saved)
    }

    fn validate(&self) -> Result<(), GameError> {
        let mut seen = HashSet::new();
        for hand in &self.participants {
            if !seen.insert(hand.id) {
                return Err(malformed(format!("{} appears more than once", hand.id)));
            }
            if let ParticipantId::Bot(n) = hand.id {
                if n > MAX_BOTS {
                    return Err(malformed(format!("{} exceeds the bot limit", hand.id)));
                }
            }
            if hand.card_values.len() > HAND_LIMIT {
                return Err(malformed(format!(
                    "{} holds {} cards",
                    hand.id,
                    hand.card_values.len()
                )));
            }
            if let Some(bad) = hand.card_values.iter().find(|v| !(1..=11).contains(*v)) {
                return Err(malformed(format!("{} has card value {bad}", hand.id)));
            }
        }
        if !self.participants.is_empty()
            && !(seen.contains(&ParticipantId::Dealer) && seen.contains(&ParticipantId::Player))
        {
            return Err(malformed("saved hands must include dealer and player".to_string()));
        }
        Ok(())
    }
}

fn malformed(reason: String) -> GameError {
    GameError::MalformedSave(reason)
}
