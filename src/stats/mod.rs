// Stat model: the shape of a single recorded stat, the builder used
// while it is being entered, and guarded rate helpers.

pub mod rates;

mod errors;
mod event;
mod kind;
mod pending;

pub use errors::StatsError;
pub use event::{CourtLocation, PlayerId, RecordedGroup, ShotDetail, ShotValue, StatDetail, StatEvent};
pub use kind::{StatCounts, StatKind};
pub use pending::{ChildLink, PendingStat, StagedChild};
pub use rates::{per_game, percentage, safe_divide, ShootingLine, ShootingSplits};
