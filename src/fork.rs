//! Process duplication
//!
//! Both fixtures fork through [`Duplicator`] so their control flow can be
//! driven branch by branch in unit tests without forking the test runner.

use nix::errno::Errno;
use nix::unistd::{fork, ForkResult, Pid};

/// Which side of a duplication the caller ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Parent { child: Pid },
    Child,
}

impl Branch {
    pub fn is_child(&self) -> bool {
        matches!(self, Branch::Child)
    }
}

impl From<ForkResult> for Branch {
    fn from(result: ForkResult) -> Self {
        match result {
            ForkResult::Parent { child } => Branch::Parent { child },
            ForkResult::Child => Branch::Child,
        }
    }
}

pub trait Duplicator {
    /// Duplicate the calling process; returns in both copies on success.
    fn duplicate(&mut self) -> Result<Branch, Errno>;
}

/// Real `fork(2)`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDuplicator;

impl Duplicator for SystemDuplicator {
    fn duplicate(&mut self) -> Result<Branch, Errno> {
        // SAFETY: the fixture binaries never start a second thread (no async
        // runtime, the tracing subscriber writes synchronously), so the child
        // inherits no lock held by another thread.
        let result = unsafe { fork() }?;
        Ok(result.into())
    }
}
