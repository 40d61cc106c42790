pub mod mocks;
pub mod setup;
pub mod stat_builders;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{FlakySink, SlowDeleteSink};
#[allow(unused_imports)]
pub use setup::{roster, TestSetup, TestSetupBuilder};
#[allow(unused_imports)]
pub use stat_builders::{foul, made, missed, rebound, steal, ShotBuilder};
