//! Fork-burst fixture
//!
//! Prints a countdown and forks after every line. With the stock three
//! iterations the burst ends with eight processes, all exiting 0.

use clap::Parser;
use forkfix::cli::BurstArgs;
use forkfix::fork::SystemDuplicator;
use forkfix::{burst, logging};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = BurstArgs::parse();

    if let Err(err) = logging::init_logger(args.log.log_level.as_deref()) {
        eprintln!("{}", err);
        return ExitCode::from(1);
    }

    let result = args
        .burst_config()
        .and_then(|config| burst::run_burst(&mut SystemDuplicator, &mut io::stdout(), &config));

    let code = match result {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{}", err.user_message());
            err.exit_code()
        }
    };
    tracing::debug!(pid = std::process::id(), code, "burst process exiting");
    ExitCode::from(code)
}
