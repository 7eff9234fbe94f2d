//! Fork-burst producer
//!
//! Counts down from `iterations - 1` to 0. Each iteration prints the value,
//! then forks; parent and child both carry on with the rest of the loop, so
//! the number of processes doubles every iteration.

use crate::error::{DuplicateStage, FixtureError, FixtureResult};
use crate::fork::{Branch, Duplicator};
use crate::platform;
use std::io::Write;

pub const DEFAULT_ITERATIONS: u32 = 3;

/// Upper bound on iterations, 2^16 processes at the end of the burst
pub const MAX_ITERATIONS: u32 = 16;

/// Validated burst size
///
/// Only [`BurstConfig::new`] and `Default` build one, so the iteration cap
/// always holds:
///
/// ```compile_fail
/// let config = forkfix::BurstConfig { iterations: 64 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstConfig {
    iterations: u32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl BurstConfig {
    pub fn new(iterations: u32) -> FixtureResult<Self> {
        if iterations > MAX_ITERATIONS {
            return Err(FixtureError::config(format!(
                "iterations must be at most {}, got {}",
                MAX_ITERATIONS, iterations
            )));
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Processes alive once every fork has succeeded, the original included
    pub fn terminal_processes(&self) -> u64 {
        1u64 << self.iterations
    }

    /// Lines written to stdout across all processes when every fork succeeds
    pub fn total_lines(&self) -> u64 {
        self.terminal_processes() - 1
    }
}

/// What one process instance did during the burst
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BurstReport {
    /// Countdown values printed by this instance, in order
    pub printed: Vec<u32>,
    /// Children this instance created
    pub forks: u32,
    /// Duplications this instance came out of as the child
    pub depth: u32,
}

/// Run the countdown loop from the calling process.
///
/// Returns in every process that finishes the loop. A failed fork returns
/// the error in the process that attempted it; its earlier children are
/// unaffected.
pub fn run_burst<D, W>(
    dup: &mut D,
    out: &mut W,
    config: &BurstConfig,
) -> FixtureResult<BurstReport>
where
    D: Duplicator,
    W: Write,
{
    let mut report = BurstReport::default();

    for countdown in (0..config.iterations).rev() {
        writeln!(out, "{}", countdown)?;
        // Unflushed bytes would be copied into the child and printed twice.
        out.flush()?;
        report.printed.push(countdown);

        match dup.duplicate() {
            Ok(Branch::Parent { child }) => {
                report.forks += 1;
                tracing::trace!(
                    pid = platform::current_pid(),
                    child = child.as_raw(),
                    countdown,
                    "forked"
                );
            }
            Ok(Branch::Child) => {
                // A fresh child has no children of its own yet.
                report.forks = 0;
                report.depth += 1;
            }
            Err(errno) => {
                tracing::warn!(pid = platform::current_pid(), countdown, %errno, "fork failed");
                return Err(FixtureError::duplicate(DuplicateStage::Burst { countdown }, errno));
            }
        }
    }

    tracing::debug!(
        pid = platform::current_pid(),
        forks = report.forks,
        depth = report.depth,
        "burst branch finished"
    );
    Ok(report)
}
