use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::events::GameEvent;

pub const DEFAULT_GAME_CAPACITY: usize = 100;

/// Event bus for distributing game events to subscribers.
///
/// Every subscriber owns a bounded queue. Events are never dropped: once a
/// subscriber is `capacity` events behind, `emit` waits for it to catch up.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Game-specific subscriber queues: game_id -> senders
    game_channels: Arc<RwLock<HashMap<Uuid, Vec<mpsc::Sender<GameEvent>>>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_GAME_CAPACITY)
    }
}

impl EventBus {
    /// Creates a new event bus whose subscriber queues hold `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            game_channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Delivers an event to every subscriber of the event's game, in the
    /// order `emit` is called. Games without subscribers drop the event.
    pub async fn emit(&self, event: GameEvent) {
        let game_id = event.game_id();
        let senders = {
            let game_channels = self.game_channels.read().await;
            match game_channels.get(&game_id) {
                Some(senders) => senders.clone(),
                None => {
                    debug!(game_id = %game_id, "Game event emitted with no receivers");
                    return;
                }
            }
        };

        let mut delivered = 0;
        for sender in &senders {
            if sender.send(event.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        debug!(
            game_id = %game_id,
            receivers = delivered,
            event_type = event.event_type(),
            "Game event emitted"
        );
    }

    /// Subscribe to events for a specific game
    pub async fn subscribe_to_game(&self, game_id: Uuid) -> mpsc::Receiver<GameEvent> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let mut game_channels = self.game_channels.write().await;
        game_channels.entry(game_id).or_default().push(sender);
        receiver
    }

    /// Drops the game's queues. Subscriptions end once they drain them.
    pub async fn close_game(&self, game_id: Uuid) {
        let mut game_channels = self.game_channels.write().await;
        if game_channels.remove(&game_id).is_some() {
            debug!(game_id = %game_id, "Closed game channel");
        }
    }

    pub async fn is_open(&self, game_id: Uuid) -> bool {
        self.game_channels.read().await.contains_key(&game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn started(game_id: Uuid) -> GameEvent {
        GameEvent::GameStarted {
            game_id,
            team_id: "team".to_string(),
            opponent_name: "Opponent".to_string(),
        }
    }

    fn opponent_score(game_id: Uuid, opponent_score: u32) -> GameEvent {
        GameEvent::OpponentScoreChanged {
            game_id,
            opponent_score,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_for_its_game() {
        let bus = EventBus::default();
        let game_id = Uuid::new_v4();
        let other_game = Uuid::new_v4();

        let mut receiver = bus.subscribe_to_game(game_id).await;
        bus.subscribe_to_game(other_game).await;
        bus.emit(started(other_game)).await;
        bus.emit(started(game_id)).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.game_id(), game_id);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_does_not_fail() {
        let bus = EventBus::new(4);
        let game_id = Uuid::new_v4();
        bus.emit(started(game_id)).await;
        assert!(!bus.is_open(game_id).await);
    }

    #[tokio::test]
    async fn test_close_game_ends_receivers() {
        let bus = EventBus::default();
        let game_id = Uuid::new_v4();
        let mut receiver = bus.subscribe_to_game(game_id).await;
        assert!(bus.is_open(game_id).await);

        bus.close_game(game_id).await;
        assert!(receiver.recv().await.is_none());
        assert!(!bus.is_open(game_id).await);
    }

    #[tokio::test]
    async fn test_full_queue_waits_instead_of_dropping() {
        let bus = EventBus::new(1);
        let game_id = Uuid::new_v4();
        let mut receiver = bus.subscribe_to_game(game_id).await;

        let emitter = {
            let bus = bus.clone();
            tokio::spawn(async move {
                for score in 0..5 {
                    bus.emit(opponent_score(game_id, score)).await;
                }
                bus.close_game(game_id).await;
            })
        };

        let mut scores = Vec::new();
        while let Some(event) = receiver.recv().await {
            // Slow consumer keeps the queue full
            tokio::time::sleep(Duration::from_millis(5)).await;
            if let GameEvent::OpponentScoreChanged { opponent_score, .. } = event {
                scores.push(opponent_score);
            }
        }
        emitter.await.unwrap();

        assert_eq!(scores, vec![0, 1, 2, 3, 4]);
    }
}
