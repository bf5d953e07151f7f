use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    cards::Card,
    deck::Deck,
    errors::GameError,
    hand::{rank_value, Hand, BLACKJACK},
    outcome::{resolve, Outcome, Tally},
    strategy::BotPolicy,
};

pub const DEALER_STANDS_ON: u8 = 17;

/// Seat at the table. Bots are numbered from 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ParticipantId {
    Dealer,
    Player,
    Bot(u8),
}

impl ParticipantId {
    pub fn name(&self) -> String {
        match self {
            ParticipantId::Dealer => "Dealer".to_string(),
            ParticipantId::Player => "Player".to_string(),
            ParticipantId::Bot(n) => format!("Bot{n}"),
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, ParticipantId::Bot(_))
    }

    /// Whether the card at `index` is dealt face down until the round resolves.
    pub fn conceals(&self, index: usize) -> bool {
        match self {
            ParticipantId::Dealer => index == 1,
            ParticipantId::Player => false,
            ParticipantId::Bot(_) => true,
        }
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantId::Dealer => f.write_str("dealer"),
            ParticipantId::Player => f.write_str("player"),
            ParticipantId::Bot(n) => write!(f, "bot{n}"),
        }
    }
}

impl FromStr for ParticipantId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dealer" => Ok(ParticipantId::Dealer),
            "player" => Ok(ParticipantId::Player),
            other => other
                .strip_prefix("bot")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|&n| n > 0)
                .map(ParticipantId::Bot)
                .ok_or_else(|| GameError::UnknownParticipant(s.to_string())),
        }
    }
}

impl From<ParticipantId> for String {
    fn from(id: ParticipantId) -> String {
        id.to_string()
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = GameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub hand: Hand,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Dealing,
    PlayerTurn,
    /// Bot turns in seat order; `next` is the zero-based bot still to act.
    BotTurns { next: usize },
    DealerTurn,
    Resolved,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    InProgress,
    PlayerBlackjack,
    PlayerBust,
    DealerBlackjack,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantResult {
    pub id: ParticipantId,
    pub total: u8,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub status: RoundStatus,
    pub dealer_total: u8,
    pub results: Vec<ParticipantResult>,
}

impl RoundResult {
    pub fn outcome_of(&self, id: ParticipantId) -> Option<Outcome> {
        self.results.iter().find(|r| r.id == id).map(|r| r.outcome)
    }

    pub fn player_outcome(&self) -> Outcome {
        self.outcome_of(ParticipantId::Player).unwrap_or(Outcome::Lose)
    }
}

/// What a renderer may show for one hand. Face-down cards are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandView {
    pub id: ParticipantId,
    pub name: String,
    pub cards: Vec<Option<Card>>,
    pub total: Option<u8>,
}

/// Player hand after a hit, with the round state it left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandState {
    pub id: ParticipantId,
    pub cards: Vec<Card>,
    pub total: u8,
    pub soft: bool,
    pub phase: Phase,
    pub status: RoundStatus,
    pub result: Option<RoundResult>,
}

/// One round from the deal to resolution. The tally is only touched when the
/// round resolves, exactly once.
#[derive(Debug, Clone)]
pub struct Round {
    number: u64,
    deck: Deck,
    participants: Vec<Participant>,
    policy: BotPolicy,
    rng: SmallRng,
    phase: Phase,
    status: RoundStatus,
    result: Option<RoundResult>,
}

impl Round {
    /// Deals two cards each to the dealer, the player and then every bot.
    ///
    /// A natural for the player or dealer resolves the round as soon as the
    /// initial deal completes.
    pub fn deal(
        number: u64,
        deck: Deck,
        bots: u8,
        policy: BotPolicy,
        rng: SmallRng,
        tally: &mut Tally,
    ) -> Result<Self, GameError> {
        let mut participants = vec![
            Participant { id: ParticipantId::Dealer, hand: Hand::new() },
            Participant { id: ParticipantId::Player, hand: Hand::new() },
        ];
        participants.extend((1..=bots).map(|n| Participant {
            id: ParticipantId::Bot(n),
            hand: Hand::new(),
        }));

        let mut round = Round {
            number,
            deck,
            participants,
            policy,
            rng,
            phase: Phase::Dealing,
            status: RoundStatus::InProgress,
            result: None,
        };
        info!(round = number, bots, cards_left = round.deck.remaining_cards(), "dealing round");

        let mut interrupt = None;
        for seat in 0..round.participants.len() {
            for _ in 0..2 {
                round.deal_to(seat)?;
                if interrupt.is_none() && !round.participants[seat].id.is_bot() {
                    interrupt = round.immediate_outcome();
                }
            }
        }

        match interrupt {
            Some(status) => round.finish(status, tally),
            None => round.phase = Phase::PlayerTurn,
        }
        Ok(round)
    }

    fn deal_to(&mut self, seat: usize) -> Result<(), GameError> {
        if self.participants[seat].hand.is_full() {
            return Err(GameError::invalid_action("hand is full"));
        }
        let card = self.deck.draw()?;
        let participant = &mut self.participants[seat];
        if !participant.hand.push(card) {
            return Err(GameError::invalid_action("hand is full"));
        }
        debug!(
            round = self.number,
            to = %participant.id,
            card = %card,
            total = participant.hand.best_total(),
            "card dealt"
        );
        Ok(())
    }

    /// Checks player bust and, once both initial hands are down, naturals.
    fn immediate_outcome(&self) -> Option<RoundStatus> {
        let player = &self.participants[1].hand;
        let dealer = &self.participants[0].hand;

        if player.is_bust() {
            return Some(RoundStatus::PlayerBust);
        }
        if self.phase != Phase::Dealing || player.len() < 2 || dealer.len() < 2 {
            return None;
        }
        match (player.is_natural(), dealer.is_natural()) {
            (true, true) => Some(RoundStatus::Resolved),
            (true, false) => Some(RoundStatus::PlayerBlackjack),
            (false, true) => Some(RoundStatus::DealerBlackjack),
            (false, false) => None,
        }
    }

    pub fn hit(&mut self, id: ParticipantId, tally: &mut Tally) -> Result<HandState, GameError> {
        if id != ParticipantId::Player {
            return Err(GameError::invalid_action(format!("{} cannot hit", id.name())));
        }
        match self.status {
            RoundStatus::PlayerBust => return Err(GameError::invalid_action("player is bust")),
            RoundStatus::PlayerBlackjack => {
                return Err(GameError::invalid_action("player has blackjack"))
            }
            _ => {}
        }
        if self.phase != Phase::PlayerTurn {
            return Err(GameError::invalid_action("player turn is over"));
        }
        if self.participants[1].hand.is_full() {
            return Err(GameError::invalid_action("hand is full"));
        }

        self.deal_to(1)?;

        if let Some(status) = self.immediate_outcome() {
            self.finish(status, tally);
        } else {
            let hand = &self.participants[1].hand;
            if hand.best_total() >= BLACKJACK || hand.is_full() {
                self.phase = Phase::BotTurns { next: 0 };
                // the player's card is already dealt; a later stand resumes the remaining turns
                match self.play_out(tally) {
                    Ok(()) => {}
                    Err(GameError::EmptyDeck) => {
                        warn!(round = self.number, phase = ?self.phase, "turns paused on empty deck");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        self.hand_state(ParticipantId::Player)
    }

    /// Ends the player's turn and plays bots and dealer through to resolution.
    pub fn stand(&mut self, tally: &mut Tally) -> Result<&RoundResult, GameError> {
        match self.phase {
            Phase::PlayerTurn => self.phase = Phase::BotTurns { next: 0 },
            Phase::BotTurns { .. } | Phase::DealerTurn => {}
            Phase::Dealing => return Err(GameError::invalid_action("cards are still being dealt")),
            Phase::Resolved => return Err(GameError::invalid_action("round is already resolved")),
        }
        self.play_out(tally)?;
        self.result
            .as_ref()
            .ok_or_else(|| GameError::invalid_action("round did not resolve"))
    }

    /// Runs the remaining turns. On an empty deck the phase is left where the
    /// draw failed so a later call resumes from there.
    fn play_out(&mut self, tally: &mut Tally) -> Result<(), GameError> {
        loop {
            match self.phase {
                Phase::BotTurns { next } => {
                    let seat = 2 + next;
                    if seat >= self.participants.len() {
                        self.phase = Phase::DealerTurn;
                        continue;
                    }
                    self.play_bot(seat)?;
                    self.phase = Phase::BotTurns { next: next + 1 };
                }
                Phase::DealerTurn => {
                    self.play_dealer()?;
                    self.finish(RoundStatus::Resolved, tally);
                }
                Phase::Resolved => return Ok(()),
                Phase::Dealing | Phase::PlayerTurn => {
                    return Err(GameError::invalid_action("player turn is not finished"))
                }
            }
        }
    }

    fn play_bot(&mut self, seat: usize) -> Result<(), GameError> {
        let upcard = self.upcard_value();
        loop {
            let hand = &self.participants[seat].hand;
            let hit = self.policy.should_hit(hand, upcard, &mut self.rng);
            debug!(
                round = self.number,
                bot = %self.participants[seat].id,
                total = hand.best_total(),
                upcard,
                hit,
                "bot decision"
            );
            if !hit {
                return Ok(());
            }
            self.deal_to(seat)?;
        }
    }

    fn play_dealer(&mut self) -> Result<(), GameError> {
        loop {
            let hand = &self.participants[0].hand;
            if hand.best_total() >= DEALER_STANDS_ON || hand.is_full() {
                return Ok(());
            }
            self.deal_to(0)?;
        }
    }

    fn finish(&mut self, status: RoundStatus, tally: &mut Tally) {
        let dealer_total = self.participants[0].hand.best_total();
        let results: Vec<ParticipantResult> = self.participants[1..]
            .iter()
            .map(|p| {
                let total = p.hand.best_total();
                let outcome = match (p.id, status) {
                    (ParticipantId::Player, RoundStatus::PlayerBlackjack) => Outcome::Blackjack,
                    _ => resolve(dealer_total, total),
                };
                ParticipantResult { id: p.id, total, outcome }
            })
            .collect();

        let result = RoundResult { status, dealer_total, results };
        let player_outcome = result.player_outcome();
        tally.record(player_outcome);
        info!(
            round = self.number,
            status = ?status,
            dealer_total,
            player_total = self.participants[1].hand.best_total(),
            outcome = %player_outcome,
            "round resolved"
        );

        self.status = status;
        self.phase = Phase::Resolved;
        self.result = Some(result);
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn seat(&self, id: ParticipantId) -> Result<usize, GameError> {
        self.participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| GameError::UnknownParticipant(id.to_string()))
    }

    pub fn hand(&self, id: ParticipantId) -> Result<&Hand, GameError> {
        Ok(&self.participants[self.seat(id)?].hand)
    }

    pub fn hand_total(&self, id: ParticipantId) -> Result<u8, GameError> {
        Ok(self.hand(id)?.best_total())
    }

    /// Point value of the dealer's face-up card.
    pub fn upcard_value(&self) -> u8 {
        self.participants[0]
            .hand
            .cards()
            .first()
            .map(|card| rank_value(card.rank))
            .unwrap_or(0)
    }

    pub fn hand_state(&self, id: ParticipantId) -> Result<HandState, GameError> {
        let hand = self.hand(id)?;
        Ok(HandState {
            id,
            cards: hand.cards().to_vec(),
            total: hand.best_total(),
            soft: hand.is_soft(),
            phase: self.phase,
            status: self.status,
            result: self.result.clone(),
        })
    }

    pub fn view(&self, id: ParticipantId) -> Result<HandView, GameError> {
        let hand = self.hand(id)?;
        let revealed = self.is_resolved();
        let cards: Vec<Option<Card>> = hand
            .cards()
            .iter()
            .enumerate()
            .map(|(i, &card)| (revealed || !id.conceals(i)).then_some(card))
            .collect();
        let total = cards.iter().all(Option::is_some).then(|| hand.best_total());
        Ok(HandView { id, name: id.name(), cards, total })
    }

    pub fn views(&self) -> Vec<HandView> {
        self.participants
            .iter()
            .filter_map(|p| self.view(p.id).ok())
            .collect()
    }
}
