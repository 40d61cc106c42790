use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error};

use super::sink::{SinkError, StatSink};
use crate::event::{EventError, GameEvent, GameEventHandler};

/// Forwards committed and undone stat groups to a [`StatSink`].
pub struct PersistenceSubscriber {
    sink: Arc<dyn StatSink>,
}

impl PersistenceSubscriber {
    pub fn new(sink: Arc<dyn StatSink>) -> Self {
        Self { sink }
    }
}

impl From<SinkError> for EventError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::Unavailable(msg) => EventError::Retryable(msg),
            SinkError::Rejected(msg) => EventError::NonRetryable(msg),
        }
    }
}

#[async_trait]
impl GameEventHandler for PersistenceSubscriber {
    async fn handle(&self, event: &GameEvent) -> Result<(), EventError> {
        match event {
            GameEvent::StatRecorded { game_id, group, .. } => {
                debug!(game_id = %game_id, stat_id = %group.parent.id(), "Saving stat group");
                self.sink.save_group(*game_id, group).await?;
            }
            GameEvent::StatUndone { game_id, group, .. } => {
                debug!(game_id = %game_id, stat_id = %group.parent.id(), "Deleting stat group");
                self.sink.delete_group(*game_id, group).await?;
            }
            GameEvent::GameRestarted { game_id, dropped } => {
                let results =
                    join_all(dropped.iter().map(|group| self.sink.delete_group(*game_id, group)))
                        .await;

                let failures: Vec<SinkError> =
                    results.into_iter().filter_map(Result::err).collect();
                if let Some(first) = failures.into_iter().next() {
                    error!(game_id = %game_id, error = %first, "Failed to delete dropped stats");
                    return Err(first.into());
                }
            }
            GameEvent::GameCompleted { summary, .. } => {
                self.sink.save_game(summary).await?;
            }
            GameEvent::GameDeleted { game_id } => {
                debug!(game_id = %game_id, "Deleting stored game");
                self.sink.delete_game(*game_id).await?;
            }
            _ => {}
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "PersistenceSubscriber"
    }
}
