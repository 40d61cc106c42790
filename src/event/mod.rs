// Event-driven plumbing around live games
//
// Game state changes are published here after they happen; persistence and
// any other observers subscribe per game.

// Public API - what other modules can use
pub use bus::{EventBus, DEFAULT_GAME_CAPACITY};
pub use events::GameEvent;
pub use handler::{EventError, GameEventHandler};
pub use subscription::GameSubscription;

// Internal modules
mod bus;
mod events;
mod handler;
mod subscription;
