#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use uuid::Uuid;

use boxscore::{
    game::GameSummary,
    persistence::{InMemoryStatSink, SinkError},
    RecordedGroup, StatSink,
};

// ============================================================================
// Mock Sinks
// ============================================================================

/// Sink that reports itself unavailable for the first `failures` saves,
/// then stores into an in-memory sink
pub struct FlakySink {
    pub inner: InMemoryStatSink,
    failures: u32,
    save_calls: AtomicU32,
}

impl FlakySink {
    pub fn new(failures: u32) -> Self {
        Self {
            inner: InMemoryStatSink::new(),
            failures,
            save_calls: AtomicU32::new(0),
        }
    }

    pub fn save_calls(&self) -> u32 {
        self.save_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StatSink for FlakySink {
    async fn save_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError> {
        let call = self.save_calls.fetch_add(1, Ordering::Relaxed);
        if call < self.failures {
            return Err(SinkError::Unavailable("connection refused".to_string()));
        }
        self.inner.save_group(game_id, group).await
    }

    async fn delete_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError> {
        self.inner.delete_group(game_id, group).await
    }

    async fn save_game(&self, summary: &GameSummary) -> Result<(), SinkError> {
        self.inner.save_game(summary).await
    }

    async fn delete_game(&self, game_id: Uuid) -> Result<(), SinkError> {
        self.inner.delete_game(game_id).await
    }
}

/// Sink whose deletes take `delay` to complete, so its subscriber falls
/// behind whenever undos arrive faster than that
pub struct SlowDeleteSink {
    pub inner: InMemoryStatSink,
    delay: Duration,
}

impl SlowDeleteSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryStatSink::new(),
            delay,
        }
    }
}

#[async_trait]
impl StatSink for SlowDeleteSink {
    async fn save_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError> {
        self.inner.save_group(game_id, group).await
    }

    async fn delete_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_group(game_id, group).await
    }

    async fn save_game(&self, summary: &GameSummary) -> Result<(), SinkError> {
        self.inner.save_game(summary).await
    }

    async fn delete_game(&self, game_id: Uuid) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_game(game_id).await
    }
}
