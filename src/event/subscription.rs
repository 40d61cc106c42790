use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    bus::EventBus,
    events::GameEvent,
    handler::{EventError, GameEventHandler},
};

/// Routes one game's events to one handler on a background task.
pub struct GameSubscription {
    game_id: Uuid,
    handler: Arc<dyn GameEventHandler>,
    event_bus: EventBus,
    handler_timeout: Duration,
    max_retries: u32,
}

impl GameSubscription {
    pub fn new(game_id: Uuid, handler: Arc<dyn GameEventHandler>, event_bus: EventBus) -> Self {
        Self {
            game_id,
            handler,
            event_bus,
            handler_timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Set the maximum number of retries for failed handlers
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Subscribes before returning, so every event emitted after this
    /// resolves reaches the handler. Events are handled in order.
    pub async fn start(self) -> JoinHandle<()> {
        let game_id = self.game_id;
        let handler_name = self.handler.name();
        let mut receiver = self.event_bus.subscribe_to_game(game_id).await;

        info!(
            game_id = %game_id,
            handler = handler_name,
            "Starting game subscription"
        );

        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                if let Err(e) = self.handle_with_retry(&event).await {
                    error!(
                        game_id = %game_id,
                        handler = handler_name,
                        event_type = event.event_type(),
                        error = %e,
                        "Game event handler failed permanently"
                    );
                }
            }

            info!(
                game_id = %game_id,
                handler = handler_name,
                "Game subscription ended - no more events"
            );
        })
    }

    async fn handle_with_retry(&self, event: &GameEvent) -> Result<(), EventError> {
        let handler_name = self.handler.name();
        let event_type = event.event_type();

        let mut attempt = 0;
        loop {
            let outcome = match timeout(self.handler_timeout, self.handler.handle(event)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(EventError::Timeout),
            };

            match outcome {
                Ok(()) => {
                    if attempt > 0 {
                        info!(
                            handler = handler_name,
                            event_type,
                            attempt = attempt + 1,
                            "Handler succeeded after retry"
                        );
                    }
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    warn!(
                        handler = handler_name,
                        event_type,
                        attempt = attempt + 1,
                        error = %e,
                        "Handler failed, will retry"
                    );

                    // Exponential backoff
                    let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
