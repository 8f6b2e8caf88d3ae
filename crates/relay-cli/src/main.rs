//! # relay CLI
//!
//! Forwards its command line to the configured dispatcher program and exits
//! with status 0 when the user presses Ctrl-C.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
