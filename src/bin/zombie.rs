//! Zombie-producer fixture
//!
//! Prints `p2 done` then, after the parent delay, `p1 done`. The middle
//! process stays a zombie until the first one exits.

use clap::Parser;
use forkfix::cli::ZombieArgs;
use forkfix::fork::SystemDuplicator;
use forkfix::{logging, zombie};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = ZombieArgs::parse();

    if let Err(err) = logging::init_logger(args.log.log_level.as_deref()) {
        eprintln!("{}", err);
        return ExitCode::from(1);
    }

    let config = args.chain_config();
    tracing::debug!(?config, pid = std::process::id(), "starting zombie chain");

    match zombie::run_chain(&mut SystemDuplicator, &mut io::stdout(), &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "zombie chain failed");
            eprintln!("{}", err.user_message());
            ExitCode::from(err.exit_code())
        }
    }
}
