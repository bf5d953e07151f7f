use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    errors::GameError,
    game::{ParticipantId, Phase, RoundResult},
    outcome::{Outcome, Tally},
    strategy::BotPolicy,
    table::{Table, TableConfig},
};

fn default_num_decks() -> u8 {
    1
}

fn default_bots() -> u8 {
    2
}

fn default_progress_interval() -> u32 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationInput {
    #[serde(default = "default_num_decks")]
    pub num_decks: u8,
    pub iterations: u32,
    pub seed: u64,
    #[serde(default = "default_bots")]
    pub bots: u8,
    #[serde(default)]
    pub bot_policy: BotPolicy,
    /// Policy the simulated player follows when deciding to hit.
    #[serde(default)]
    pub player_policy: BotPolicy,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub total_rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub blackjacks: u32,
    pub player_busts: u32,
    pub dealer_busts: u32,
    pub aborted_rounds: u32,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub tie_rate: f64,
    /// Combined record of every bot seat. Bots never count toward the player's tally.
    pub bot_record: Tally,
}

pub fn run(input: SimulationInput) -> Result<SimulationResult, GameError> {
    run_with_progress(input, |_current, _total| {})
}

pub fn run_with_progress<F>(input: SimulationInput, mut progress_cb: F) -> Result<SimulationResult, GameError>
where
    F: FnMut(u32, u32),
{
    let mut table = Table::new(TableConfig {
        deck_count: input.num_decks,
        bots: input.bots,
        bot_policy: input.bot_policy,
        seed: Some(input.seed),
    })?;
    let mut player_rng = SmallRng::seed_from_u64(input.seed.rotate_left(32));

    let mut blackjacks = 0;
    let mut player_busts = 0;
    let mut dealer_busts = 0;
    let mut aborted_rounds = 0;
    let mut bot_record = Tally::default();

    let progress_interval = input.progress_interval.max(1);

    for round_index in 0..input.iterations {
        match play_round(&mut table, input.num_decks, input.player_policy, &mut player_rng) {
            Ok(result) => {
                match result.player_outcome() {
                    Outcome::Blackjack => blackjacks += 1,
                    Outcome::Bust => player_busts += 1,
                    _ => {}
                }
                if result.dealer_total > 21 {
                    dealer_busts += 1;
                }
                for bot in result.results.iter().filter(|r| r.id.is_bot()) {
                    bot_record.record(bot.outcome);
                }
            }
            Err(GameError::EmptyDeck) => {
                debug!(round = round_index, "round aborted on empty deck");
                aborted_rounds += 1;
            }
            Err(err) => return Err(err),
        }

        let completed = round_index + 1;
        if completed % progress_interval == 0 || completed == input.iterations {
            progress_cb(completed, input.iterations);
        }
    }

    let tally = table.tally();
    let total_rounds = tally.rounds();
    let rate = |count: u32| {
        if total_rounds > 0 {
            (count as f64 / total_rounds as f64) * 100.0
        } else {
            0.0
        }
    };
    info!(
        rounds = total_rounds,
        wins = tally.wins,
        losses = tally.losses,
        ties = tally.ties,
        aborted = aborted_rounds,
        "simulation finished"
    );

    Ok(SimulationResult {
        total_rounds,
        wins: tally.wins,
        losses: tally.losses,
        ties: tally.ties,
        blackjacks,
        player_busts,
        dealer_busts,
        aborted_rounds,
        win_rate: rate(tally.wins),
        loss_rate: rate(tally.losses),
        tie_rate: rate(tally.ties),
        bot_record,
    })
}

fn play_round(
    table: &mut Table,
    num_decks: u8,
    policy: BotPolicy,
    rng: &mut SmallRng,
) -> Result<RoundResult, GameError> {
    let id = table.new_round(num_decks)?;
    loop {
        let round = table.round(id)?;
        if let Some(result) = round.result() {
            return Ok(result.clone());
        }
        if round.phase() != Phase::PlayerTurn {
            return table.stand(id);
        }
        let hand = round.hand(ParticipantId::Player)?;
        if policy.should_hit(hand, round.upcard_value(), rng) {
            table.hit(id, ParticipantId::Player)?;
        } else {
            return table.stand(id);
        }
    }
}
