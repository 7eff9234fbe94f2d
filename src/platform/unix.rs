use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::thread;
use std::time::Duration;

/// Pid of the calling process
///
/// Re-read on every call: after a fork the child must not reuse a pid
/// cached by its parent.
pub fn current_pid() -> u32 {
    std::process::id()
}

/// Parent pid of the calling process
pub fn parent_pid() -> u32 {
    nix::unistd::getppid().as_raw() as u32
}

/// Check if process is alive
///
/// A zombie still counts as alive here: it keeps its process table entry
/// until reaped.
pub fn process_alive(pid: u32) -> bool {
    match send_probe(pid) {
        Ok(()) => true,
        Err(errno) => errno == Errno::EPERM, // EPERM means process exists but no permission
    }
}

/// Block the calling process for a fixed duration
pub fn sleep_for(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// Signal 0 performs the permission and existence checks without
/// delivering anything.
fn send_probe(pid: u32) -> Result<(), Errno> {
    let raw = libc::pid_t::try_from(pid).map_err(|_| Errno::ESRCH)?;
    signal::kill(Pid::from_raw(raw), None::<Signal>)
}
