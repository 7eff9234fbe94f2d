//! forkfix
//!
//! Process-table test fixtures: a three-generation chain that leaves a
//! transient zombie behind, and a countdown loop that forks on every step.
//! The library holds the fixture logic plus a read-only process-table view
//! for harnesses that want to watch them.

#[cfg(not(unix))]
compile_error!("forkfix fixtures require a Unix fork(2)");

pub mod burst;
pub mod cli;
pub mod error;
pub mod fork;
pub mod inspect;
pub mod logging;
pub mod platform;
pub mod zombie;

pub use burst::{run_burst, BurstConfig, BurstReport};
pub use error::{DuplicateStage, FixtureError, FixtureResult};
pub use fork::{Branch, Duplicator, SystemDuplicator};
pub use inspect::{ProcessSnapshot, ProcessState};
pub use zombie::{run_chain, ChainConfig, ChainOutcome, Generation};
