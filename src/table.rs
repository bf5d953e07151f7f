use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    deck::Deck,
    errors::GameError,
    game::{HandState, HandView, ParticipantId, Phase, Round, RoundResult, RoundStatus},
    outcome::Tally,
    persist::{SavedGame, SavedHand},
    strategy::BotPolicy,
};

pub const MAX_BOTS: u8 = 6;

fn default_deck_count() -> u8 {
    1
}

fn default_bots() -> u8 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_deck_count")]
    pub deck_count: u8,
    #[serde(default = "default_bots")]
    pub bots: u8,
    #[serde(default)]
    pub bot_policy: BotPolicy,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            deck_count: default_deck_count(),
            bots: default_bots(),
            bot_policy: BotPolicy::default(),
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.deck_count == 0 {
            return Err(GameError::InvalidConfig("deck_count must be at least 1".to_string()));
        }
        if self.bots > MAX_BOTS {
            return Err(GameError::InvalidConfig(format!(
                "at most {MAX_BOTS} bots are supported, got {}",
                self.bots
            )));
        }
        Ok(())
    }
}

/// Handle for the round a caller is acting on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(pub u64);

#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub id: RoundId,
    pub phase: Phase,
    pub status: RoundStatus,
    pub cards_left: usize,
    pub hands: Vec<HandView>,
    pub result: Option<RoundResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableState {
    pub tally: Tally,
    pub round: Option<RoundSnapshot>,
    pub restored_hands: Vec<SavedHand>,
}

/// A player's seat at the table: the running tally plus the round in play.
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    tally: Tally,
    rng: SmallRng,
    rounds_started: u64,
    round: Option<Round>,
    restored: Vec<SavedHand>,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Table {
            config,
            tally: Tally::default(),
            rng,
            rounds_started: 0,
            round: None,
            restored: Vec::new(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Shuffles `deck_count` fresh decks and deals a new round, abandoning any round in play.
    pub fn new_round(&mut self, deck_count: u8) -> Result<RoundId, GameError> {
        if deck_count == 0 {
            return Err(GameError::InvalidConfig("deck_count must be at least 1".to_string()));
        }
        let mut rng = SmallRng::seed_from_u64(self.rng.gen());
        let deck = Deck::shuffled(deck_count, &mut rng);
        self.start_round(deck, rng)
    }

    /// Deals a new round from a prepared deck.
    pub fn new_round_with_deck(&mut self, deck: Deck) -> Result<RoundId, GameError> {
        let rng = SmallRng::seed_from_u64(self.rng.gen());
        self.start_round(deck, rng)
    }

    fn start_round(&mut self, deck: Deck, rng: SmallRng) -> Result<RoundId, GameError> {
        let number = self.rounds_started + 1;
        let round = Round::deal(
            number,
            deck,
            self.config.bots,
            self.config.bot_policy,
            rng,
            &mut self.tally,
        )?;
        self.rounds_started = number;
        self.round = Some(round);
        self.restored.clear();
        Ok(RoundId(number))
    }

    fn active(round: &mut Option<Round>, id: RoundId) -> Result<&mut Round, GameError> {
        let round = round.as_mut().ok_or(GameError::NoRoundInProgress)?;
        if round.number() != id.0 {
            return Err(GameError::StaleRound {
                expected: round.number(),
                actual: id.0,
            });
        }
        Ok(round)
    }

    pub fn round(&self, id: RoundId) -> Result<&Round, GameError> {
        let round = self.round.as_ref().ok_or(GameError::NoRoundInProgress)?;
        if round.number() != id.0 {
            return Err(GameError::StaleRound {
                expected: round.number(),
                actual: id.0,
            });
        }
        Ok(round)
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn hit(&mut self, id: RoundId, who: ParticipantId) -> Result<HandState, GameError> {
        let round = Self::active(&mut self.round, id)?;
        round.hit(who, &mut self.tally).inspect_err(|err| {
            warn!(round = id.0, participant = %who, error = %err, "hit rejected");
        })
    }

    pub fn stand(&mut self, id: RoundId) -> Result<RoundResult, GameError> {
        let round = Self::active(&mut self.round, id)?;
        match round.stand(&mut self.tally) {
            Ok(result) => Ok(result.clone()),
            Err(err) => {
                warn!(round = id.0, error = %err, "stand did not resolve");
                Err(err)
            }
        }
    }

    pub fn hand_total(&self, id: RoundId, who: ParticipantId) -> Result<u8, GameError> {
        self.round(id)?.hand_total(who)
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn restored_hands(&self) -> &[SavedHand] {
        &self.restored
    }

    pub fn snapshot(&self) -> TableState {
        let round = self.round.as_ref().map(|round| RoundSnapshot {
            id: RoundId(round.number()),
            phase: round.phase(),
            status: round.status(),
            cards_left: round.deck().remaining_cards(),
            hands: round.views(),
            result: round.result().cloned(),
        });
        TableState {
            tally: self.tally,
            round,
            restored_hands: self.restored.clone(),
        }
    }

    pub fn save_state(&self) -> Result<String, GameError> {
        SavedGame::capture(self.tally, self.round.as_ref(), &self.restored).to_json()
    }

    /// Replaces the tally and saved hands from a JSON record. Nothing changes
    /// unless the whole record is valid. Any round in play is discarded.
    pub fn load_state(&mut self, json: &str) -> Result<(), GameError> {
        let saved = SavedGame::from_json(json)?;
        info!(
            wins = saved.tally.wins,
            losses = saved.tally.losses,
            ties = saved.tally.ties,
            hands = saved.participants.len(),
            "state loaded"
        );
        self.tally = saved.tally;
        self.restored = saved.participants;
        self.round = None;
        Ok(())
    }
}
