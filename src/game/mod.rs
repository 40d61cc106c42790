// Live games: the stat ledger, the roster and lineup around it, and the
// service and HTTP routes that drive them.

// Public API
pub use handlers::routes;
pub use ledger::{GameStatLedger, LedgerState, ShotFilter};
pub use lineup::{Lineup, MAX_ON_COURT};
pub use live_game::{GameSummary, LiveGame};
pub use repository::{GameRepository, SharedGame};
pub use roster::{Player, Team};
pub use service::{GameService, GameServiceBuilder};
pub use types::{
    LineupRequest, OpponentScoreRequest, PlayerGameTotals, RecordStatRequest, ShotQuery,
    StartGameRequest,
};

// Internal modules
mod handlers;
mod ledger;
mod lineup;
mod live_game;
mod repository;
mod roster;
mod service;
mod types;
