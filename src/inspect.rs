//! Process table observation
//!
//! Read-only view of the process table used to watch the fixtures from the
//! outside: which children a pid has and which of them are zombies. Nothing
//! here signals or reaps.

use crate::error::{FixtureError, FixtureResult};
use psutil::process::{self, Process, Status};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Sleeping,
    Zombie,
    Other(String),
}

impl From<Status> for ProcessState {
    fn from(status: Status) -> Self {
        match status {
            Status::Running => ProcessState::Running,
            Status::Sleeping | Status::Idle => ProcessState::Sleeping,
            Status::Zombie => ProcessState::Zombie,
            other => ProcessState::Other(format!("{:?}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub ppid: Option<u32>,
    pub state: ProcessState,
}

impl ProcessSnapshot {
    pub fn is_zombie(&self) -> bool {
        self.state == ProcessState::Zombie
    }
}

/// Snapshot a single process
pub fn snapshot(pid: u32) -> FixtureResult<ProcessSnapshot> {
    let process = Process::new(pid).map_err(|err| inspect_error(pid, err))?;
    read_snapshot(&process).map_err(|err| inspect_error(pid, err))
}

/// Every process whose parent is `pid`
///
/// Processes that exit between listing and reading are skipped.
pub fn children_of(pid: u32) -> FixtureResult<Vec<ProcessSnapshot>> {
    let listing = process::processes().map_err(|err| FixtureError::Inspect {
        pid,
        message: err.to_string(),
    })?;

    let children = listing
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|process| read_snapshot(&process).ok())
        .filter(|snap| snap.ppid == Some(pid))
        .collect();
    Ok(children)
}

pub fn zombie_children_of(pid: u32) -> FixtureResult<Vec<ProcessSnapshot>> {
    Ok(children_of(pid)?
        .into_iter()
        .filter(ProcessSnapshot::is_zombie)
        .collect())
}

/// Poll until `pid` has a zombie child or `timeout` elapses
pub fn wait_for_zombie_child(
    pid: u32,
    timeout: Duration,
    poll: Duration,
) -> FixtureResult<Option<ProcessSnapshot>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(zombie) = zombie_children_of(pid)?.into_iter().next() {
            tracing::debug!(parent = pid, zombie = zombie.pid, "zombie child observed");
            return Ok(Some(zombie));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(poll);
    }
}

fn read_snapshot(process: &Process) -> Result<ProcessSnapshot, process::ProcessError> {
    Ok(ProcessSnapshot {
        pid: process.pid(),
        ppid: process.ppid()?,
        state: process.status()?.into(),
    })
}

fn inspect_error(pid: u32, err: process::ProcessError) -> FixtureError {
    FixtureError::Inspect {
        pid,
        message: format!("{:?}", err),
    }
}
