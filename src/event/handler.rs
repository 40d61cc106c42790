use async_trait::async_trait;
use thiserror::Error;

use super::events::GameEvent;

/// Errors that can occur when handling events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Retryable error: {0}")]
    Retryable(String),

    #[error("Non-retryable error: {0}")]
    NonRetryable(String),
}

impl EventError {
    /// Whether this error indicates the operation should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, EventError::Retryable(_) | EventError::Timeout)
    }

    pub fn retryable(msg: impl Into<String>) -> Self {
        EventError::Retryable(msg.into())
    }

    pub fn non_retryable(msg: impl Into<String>) -> Self {
        EventError::NonRetryable(msg.into())
    }
}

/// Trait for components that react to game events
///
/// Handlers run in background subscription tasks, after the game state has
/// already changed. A failing handler never affects the game itself.
#[async_trait]
pub trait GameEventHandler: Send + Sync {
    /// Handle a game event
    ///
    /// Handlers should be idempotent where possible since retryable
    /// failures cause the same event to be delivered again.
    async fn handle(&self, event: &GameEvent) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}
