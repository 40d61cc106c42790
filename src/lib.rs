// Library crate for the live basketball stat tracker
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod game;
pub mod persistence;
pub mod season;
pub mod shared;
pub mod stats;

use axum::Router;
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigError};
pub use event::{EventBus, GameEvent, GameEventHandler, GameSubscription};
pub use game::{GameRepository, GameService, GameStatLedger, LiveGame};
pub use persistence::{InMemoryStatSink, PersistenceSubscriber, StatSink};
pub use shared::{AppError, AppState};
pub use stats::{PendingStat, RecordedGroup, StatEvent, StatKind, StatsError};

/// The full HTTP application with request tracing.
pub fn app(state: AppState) -> Router {
    game::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
