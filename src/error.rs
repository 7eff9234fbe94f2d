//! Error handling for the fixture binaries
//!
//! Every failure a fixture can hit ends the calling process with status 1,
//! so the error type mostly exists to carry a readable message to stderr.

use nix::errno::Errno;
use std::fmt;
use std::io;
use thiserror::Error;

/// Where in a fixture a failed process duplication ended the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateStage {
    /// Fork-burst iteration, holding the countdown value just printed
    Burst { countdown: u32 },
}

impl fmt::Display for DuplicateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateStage::Burst { countdown } => {
                write!(f, "fork burst (countdown {})", countdown)
            }
        }
    }
}

/// Main error type for the fixtures
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Process duplication failed
    #[error("fork failed in {stage}: {source}")]
    Duplicate {
        stage: DuplicateStage,
        #[source]
        source: Errno,
    },

    /// Writing a marker or countdown line failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Reading the process table failed
    #[error("failed to inspect process {pid}: {message}")]
    Inspect { pid: u32, message: String },

    /// Invalid fixture configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl FixtureError {
    pub fn duplicate(stage: DuplicateStage, source: Errno) -> Self {
        FixtureError::Duplicate { stage, source }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FixtureError::Config {
            message: message.into(),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Line written to stderr before exiting.
    ///
    /// Duplication failures print only the libc `strerror` text, the same
    /// line `perror(NULL)` produces.
    pub fn user_message(&self) -> String {
        match self {
            FixtureError::Duplicate { source, .. } => os_error_text(*source),
            other => other.to_string(),
        }
    }
}

pub type FixtureResult<T> = Result<T, FixtureError>;

/// `strerror` text for `errno`, without std's " (os error N)" suffix
fn os_error_text(errno: Errno) -> String {
    let text = io::Error::from_raw_os_error(errno as i32).to_string();
    match text.rsplit_once(" (os error ") {
        Some((description, _)) => description.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_failure_renders_os_description() {
        let err = FixtureError::duplicate(DuplicateStage::Burst { countdown: 2 }, Errno::EAGAIN);
        let message = err.user_message();
        assert!(!message.is_empty());
        assert!(!message.contains("os error"));
        assert!(err.to_string().contains("countdown 2"));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn duplicate_failure_uses_libc_wording() {
        let err = FixtureError::duplicate(DuplicateStage::Burst { countdown: 0 }, Errno::EAGAIN);
        assert_eq!(err.user_message(), "Resource temporarily unavailable");
    }

    #[test]
    fn config_error_keeps_message() {
        let err = FixtureError::config("iterations must be at most 16");
        assert_eq!(
            err.user_message(),
            "Configuration error: iterations must be at most 16"
        );
    }

    #[test]
    fn output_error_converts_from_io() {
        let err: FixtureError = io::Error::from(io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, FixtureError::Output(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
