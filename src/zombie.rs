//! Zombie-producer
//!
//! Builds a three-generation chain P1 -> P2 -> P3:
//!
//! - P1 sleeps, prints `p1 done`, exits. It never waits on P2, so P2 sits in
//!   the process table as a zombie for most of P1's delay.
//! - P2 forks P3, prints `p2 done` right away and exits without waiting.
//! - P3 sleeps longer than everyone else and exits silently, re-parented to
//!   whichever process reaps orphans.

use crate::error::FixtureResult;
use crate::fork::{Branch, Duplicator};
use crate::platform;
use nix::unistd::Pid;
use std::fmt;
use std::io::Write;
use std::time::Duration;

pub const P1_MARKER: &str = "p1 done";
pub const P2_MARKER: &str = "p2 done";

pub const DEFAULT_PARENT_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_GRANDCHILD_DELAY: Duration = Duration::from_secs(3);

/// Role a process plays in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    P1,
    P2,
    P3,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Generation::P1 => "p1",
            Generation::P2 => "p2",
            Generation::P3 => "p3",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// How long P1 lingers before printing and exiting
    pub parent_delay: Duration,
    /// How long P3 outlives the rest of the chain
    pub grandchild_delay: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            parent_delay: DEFAULT_PARENT_DELAY,
            grandchild_delay: DEFAULT_GRANDCHILD_DELAY,
        }
    }
}

/// What the calling process did before returning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainOutcome {
    pub generation: Generation,
    pub pid: u32,
}

/// Run the chain from the calling process.
///
/// Returns once in every process of the chain; the caller exits with the
/// outcome (always status 0 on success). A failed fork is not an error:
/// the caller carries on as the child side, so P1 becomes P2 and P2 becomes
/// P3 in the same process.
pub fn run_chain<D, W>(
    dup: &mut D,
    out: &mut W,
    config: &ChainConfig,
) -> FixtureResult<ChainOutcome>
where
    D: Duplicator,
    W: Write,
{
    if let Some(p2) = duplicate_or_continue(dup, Generation::P1) {
        tracing::debug!(
            pid = platform::current_pid(),
            p2 = p2.as_raw(),
            "p1 waiting without reaping"
        );
        platform::sleep_for(config.parent_delay);
        emit(out, P1_MARKER)?;
        return Ok(finish(Generation::P1));
    }

    match duplicate_or_continue(dup, Generation::P2) {
        Some(p3) => {
            tracing::debug!(
                pid = platform::current_pid(),
                p3 = p3.as_raw(),
                "p2 leaving p3 behind"
            );
            emit(out, P2_MARKER)?;
            Ok(finish(Generation::P2))
        }
        None => {
            platform::sleep_for(config.grandchild_delay);
            Ok(finish(Generation::P3))
        }
    }
}

/// Child pid when the caller stays on the parent side, `None` otherwise.
fn duplicate_or_continue<D: Duplicator>(dup: &mut D, generation: Generation) -> Option<Pid> {
    match dup.duplicate() {
        Ok(Branch::Parent { child }) => Some(child),
        Ok(Branch::Child) => None,
        Err(errno) => {
            tracing::warn!(
                pid = platform::current_pid(),
                %generation,
                %errno,
                "fork failed, continuing on the child side"
            );
            None
        }
    }
}

fn emit<W: Write>(out: &mut W, marker: &str) -> FixtureResult<()> {
    writeln!(out, "{}", marker)?;
    out.flush()?;
    Ok(())
}

fn finish(generation: Generation) -> ChainOutcome {
    let pid = platform::current_pid();
    tracing::debug!(pid, %generation, "chain process exiting");
    ChainOutcome { generation, pid }
}
