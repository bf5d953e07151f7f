use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No more cards in the deck")]
    EmptyDeck,
    #[error("Invalid action: {reason}")]
    InvalidAction { reason: String },
    #[error("No round in progress")]
    NoRoundInProgress,
    #[error("Round {actual} is no longer active (current round is {expected})")]
    StaleRound { expected: u64, actual: u64 },
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Malformed save record: {0}")]
    MalformedSave(String),
}

impl GameError {
    pub(crate) fn invalid_action(reason: impl Into<String>) -> Self {
        GameError::InvalidAction {
            reason: reason.into(),
        }
    }
}
