// Best-effort storage of recorded stats. The ledger is the source of truth;
// everything here runs after the fact on subscription tasks.

pub use sink::{InMemoryStatSink, SinkError, StatSink};
pub use subscriber::PersistenceSubscriber;

mod sink;
mod subscriber;
