//! Platform helpers
//!
//! The fixtures only make sense where `fork` exists, so only the Unix
//! implementation is provided.

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::*;
