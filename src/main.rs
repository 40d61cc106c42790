use boxscore::{
    app, AppState, Config, EventBus, GameRepository, GameService, InMemoryStatSink,
    PersistenceSubscriber,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxscore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(bind_addr = %config.bind_addr, "Starting boxscore server");

    // Stats are kept in memory; swap the sink for durable storage
    let sink = Arc::new(InMemoryStatSink::new());
    let game_service = GameService::builder(
        GameRepository::new(),
        EventBus::new(config.event_capacity),
    )
    .with_handler(Arc::new(PersistenceSubscriber::new(sink)))
    .build();

    let app = app(AppState::new(Arc::new(game_service)));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind_addr = %config.bind_addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!("Server running on http://{}", config.bind_addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped");
    }
}
