use js_sys::Function;
use wasm_bindgen::prelude::*;

pub mod cards;
#[cfg(target_arch = "wasm32")]
mod console;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod outcome;
pub mod persist;
pub mod sim;
pub mod strategy;
pub mod table;

pub use errors::GameError;
pub use game::{ParticipantId, Phase, Round, RoundResult, RoundStatus};
pub use outcome::{Outcome, Tally};
pub use table::{RoundId, Table, TableConfig};

fn install_hooks() {
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    console::init();
}

/// Browser handle to a [`Table`]. Participants are addressed as
/// `"player"`, `"dealer"` or `"bot<N>"`.
#[wasm_bindgen]
pub struct BlackjackTable {
    table: Table,
}

#[wasm_bindgen]
impl BlackjackTable {
    #[wasm_bindgen(constructor)]
    pub fn new(config: &JsValue) -> Result<BlackjackTable, JsValue> {
        install_hooks();
        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?
        };
        let table = Table::new(config)
            .map_err(|err| JsValue::from_str(&format!("Table setup failed: {err}")))?;
        Ok(BlackjackTable { table })
    }

    /// Deals a new round and returns its id. Uses the configured deck count when none is given.
    pub fn new_round(&mut self, deck_count: Option<u8>) -> Result<u64, JsValue> {
        let deck_count = deck_count.unwrap_or(self.table.config().deck_count);
        self.table
            .new_round(deck_count)
            .map(|id| id.0)
            .map_err(|err| JsValue::from_str(&format!("Deal failed: {err}")))
    }

    pub fn hit(&mut self, round: u64, participant: &str) -> Result<JsValue, JsValue> {
        let who = parse_participant(participant)?;
        let state = self
            .table
            .hit(RoundId(round), who)
            .map_err(|err| JsValue::from_str(&format!("Hit failed: {err}")))?;
        to_js(&state)
    }

    pub fn stand(&mut self, round: u64) -> Result<JsValue, JsValue> {
        let result = self
            .table
            .stand(RoundId(round))
            .map_err(|err| JsValue::from_str(&format!("Stand failed: {err}")))?;
        to_js(&result)
    }

    pub fn hand_total(&self, round: u64, participant: &str) -> Result<u8, JsValue> {
        let who = parse_participant(participant)?;
        self.table
            .hand_total(RoundId(round), who)
            .map_err(|err| JsValue::from_str(&format!("Lookup failed: {err}")))
    }

    pub fn tally(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.tally())
    }

    /// Tally, cards left and every hand as the renderer may show it.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.snapshot())
    }

    pub fn save_state(&self) -> Result<String, JsValue> {
        self.table
            .save_state()
            .map_err(|err| JsValue::from_str(&format!("Save failed: {err}")))
    }

    pub fn load_state(&mut self, json: &str) -> Result<(), JsValue> {
        self.table
            .load_state(json)
            .map_err(|err| JsValue::from_str(&format!("Load failed: {err}")))
    }
}

fn parse_participant(participant: &str) -> Result<ParticipantId, JsValue> {
    participant
        .parse()
        .map_err(|err: GameError| JsValue::from_str(&format!("Invalid input: {err}")))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

#[wasm_bindgen]
pub fn run_simulation(params: &JsValue) -> Result<JsValue, JsValue> {
    install_hooks();
    let input: sim::SimulationInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let result = sim::run(input)
        .map_err(|err| JsValue::from_str(&format!("Simulation failed: {err}")))?;

    to_js(&result)
}

#[wasm_bindgen]
pub fn run_simulation_with_progress(
    params: &JsValue,
    progress_callback: &Function,
) -> Result<JsValue, JsValue> {
    install_hooks();
    let input: sim::SimulationInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let mut progress_cb = |current: u32, total: u32| {
        let _ = progress_callback.call2(
            &JsValue::NULL,
            &JsValue::from(current),
            &JsValue::from(total),
        );
    };

    let result = sim::run_with_progress(input, &mut progress_cb)
        .map_err(|err| JsValue::from_str(&format!("Simulation failed: {err}")))?;

    to_js(&result)
}
