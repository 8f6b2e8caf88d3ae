//! # relay-core
//!
//! Entry-point plumbing for command-line tools: source an argument vector,
//! hand it to a dispatcher, and turn a user interrupt (Ctrl-C) into a clean
//! exit with status 0.
//!
//! ## Main Types
//!
//! - [`Launcher`] – the entry point (`entry`) and invocation (`invoke`) operations
//! - [`Dispatcher`] – the seam a command implementation plugs into
//! - [`ProcessDispatcher`] – a dispatcher that runs an external program
//! - [`RelayError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`args`] – argument vector sources
//! - [`config`] – configuration (`~/.relay/config.yaml`)
//! - [`constants`] – paths, environment variable names, exit codes
//! - [`dispatch`] – the dispatcher trait
//! - [`errors`] – error types
//! - [`interrupt`] – Ctrl-C handling and interrupt shields
//! - [`launcher`] – entry and invoke
//! - [`process`] – external program dispatcher
//!
//! ## Example
//!
//! ```ignore
//! use relay_core::{Launcher, ProcessDispatcher, RelayConfig};
//!
//! let config = RelayConfig::load()?;
//! let dispatcher = ProcessDispatcher::from_config(&config.dispatcher)?;
//! Launcher::for_process(dispatcher).entry()?;
//! ```

pub mod args;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod errors;
pub mod interrupt;
pub mod launcher;
pub mod process;

pub use args::{ArgSource, FixedArgs, ProcessArgs};
pub use config::{DispatcherConfig, LogConfig, RelayConfig};
pub use constants::{
    is_truthy, CONFIG_FILENAME, ENV_CONFIG, ENV_PROGRAM, ENV_VERBOSE, INTERRUPT_EXIT_CODE,
    RELAY_HOME_DIR,
};
pub use dispatch::Dispatcher;
pub use errors::RelayError;
pub use interrupt::{shield, Interrupt, ProcessExit, ShieldGuard, Terminator};
pub use launcher::Launcher;
pub use process::ProcessDispatcher;
