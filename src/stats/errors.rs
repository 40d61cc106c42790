use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Player is not on the roster: {0}")]
    UnknownPlayer(String),
}

impl StatsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StatsError::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        StatsError::InvalidState(msg.into())
    }
}
