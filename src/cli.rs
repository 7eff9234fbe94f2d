//! Command line arguments for the fixture binaries
//!
//! Every flag is optional; running a fixture with no arguments gives the
//! stock timing and countdown.

use crate::burst::{BurstConfig, DEFAULT_ITERATIONS};
use crate::error::FixtureResult;
use crate::zombie::ChainConfig;
use clap::{Args, Parser};
use std::time::Duration;

/// Logging flags shared by both binaries
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogArgs {
    /// Tracing filter (trace, debug, info, warn, error or a directive list); overrides RUST_LOG
    #[arg(long, value_name = "filter")]
    pub log_level: Option<String>,
}

/// Leave a transient zombie in the process table
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "zombie", version)]
pub struct ZombieArgs {
    /// How long the first process waits before printing `p1 done`
    #[arg(long, value_name = "ms", default_value_t = 500)]
    pub parent_delay_ms: u64,

    /// How long the grandchild lives after the rest of the chain
    #[arg(long, value_name = "ms", default_value_t = 3000)]
    pub grandchild_delay_ms: u64,

    #[command(flatten)]
    pub log: LogArgs,
}

impl ZombieArgs {
    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            parent_delay: Duration::from_millis(self.parent_delay_ms),
            grandchild_delay: Duration::from_millis(self.grandchild_delay_ms),
        }
    }
}

/// Fork once per countdown step, doubling the process count each time
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fork-burst", version)]
pub struct BurstArgs {
    /// Number of countdown steps (and forks per lineage)
    #[arg(long, value_name = "n", default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    #[command(flatten)]
    pub log: LogArgs,
}

impl BurstArgs {
    pub fn burst_config(&self) -> FixtureResult<BurstConfig> {
        BurstConfig::new(self.iterations)
    }
}
