//! Process wiring for the `relay` binary.
//!
//! relay parses none of its own arguments: the whole command line belongs to
//! the dispatched program. This module loads configuration, installs
//! tracing, builds the launcher and maps the outcome onto an exit code.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. Environment variables (`RELAY_PROGRAM`, `RELAY_VERBOSE`, `RELAY_COLOR`)
//! 2. Config file (`$RELAY_CONFIG` or `~/.relay/config.yaml`)
//! 3. Built-in defaults

use std::process::ExitCode;

use anyhow::Context;

use relay_core::{
    interrupt, is_truthy, Launcher, ProcessDispatcher, RelayConfig, RelayError, ENV_CONFIG,
    ENV_PROGRAM, ENV_VERBOSE,
};

use crate::ui::Style;

/// Version string
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Run function
// ============================================================================

/// Run the relay binary.
///
/// Returns `ExitCode::SUCCESS` when the dispatched program succeeds. A user
/// interrupt never returns here: the launcher exits the process with 0.
/// A failing child's exit code is mirrored; relay's own failures print one
/// styled error and return `ExitCode::FAILURE`.
///
/// A Ctrl-C during startup, before the launcher holds its first shield, is
/// kept pending and still ends the process with 0.
pub fn run() -> ExitCode {
    interrupt::arm();

    let style = Style::from_env();
    let verbose = std::env::var(ENV_VERBOSE).is_ok_and(|v| is_truthy(&v));

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(_) if interrupt::requested() => return ExitCode::SUCCESS,
        Err(e) => {
            init_tracing(verbose, "warn");
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to load configuration",
                    Some(&e.to_string()),
                    Some(&format!(
                        "Check {} or point {} at another file",
                        config_location(),
                        ENV_CONFIG
                    )),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    init_tracing(verbose, config.log.effective_level());
    tracing::debug!("relay {}", VERSION);

    // Warnings logged while loading were emitted before the subscriber existed.
    if let Some(path) = RelayConfig::missing_env_path(&|key: &str| std::env::var(key).ok()) {
        tracing::warn!("{} points at {}, which does not exist", ENV_CONFIG, path.display());
    }
    if let Ok(warnings) = config.validate() {
        for warning in warnings {
            tracing::warn!("Config warning: {}", warning);
        }
    }

    match dispatch(&config) {
        Ok(()) => ExitCode::SUCCESS,
        // Startup failed after the user had already pressed Ctrl-C.
        Err(_) if interrupt::requested() => ExitCode::SUCCESS,
        Err(e) => report(&style, &e),
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// - `level` applies to relay's own targets
/// - `RELAY_VERBOSE` forces `debug`
fn init_tracing(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    let filter = format!("relay_core={},relay_cli={}", level, level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(config: &RelayConfig) -> anyhow::Result<()> {
    let dispatcher = ProcessDispatcher::from_config(&config.dispatcher)?;
    let program = dispatcher.program().to_string();

    Launcher::for_process(dispatcher)
        .entry()
        .with_context(|| format!("Dispatch to `{}` failed", program))
}

// ============================================================================
// Error reporting
// ============================================================================

fn report(style: &Style, err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<RelayError>() {
        // The child has already spoken for itself.
        Some(RelayError::ChildFailed { program, code }) => {
            tracing::debug!("`{}` exited with status {}", program, code);
            ExitCode::from(exit_status_byte(*code))
        }
        Some(RelayError::MissingProgram) => {
            eprintln!(
                "{}",
                style.error_with_context(
                    "No dispatcher program configured",
                    None,
                    Some(&format!(
                        "Set {} or dispatcher.program in {}",
                        ENV_PROGRAM,
                        config_location()
                    )),
                )
            );
            ExitCode::FAILURE
        }
        _ => {
            let cause = err.chain().nth(1).map(|c| c.to_string());
            eprintln!(
                "{}",
                style.error_with_context(&err.to_string(), cause.as_deref(), None)
            );
            ExitCode::FAILURE
        }
    }
}

/// Clamp a child exit code into a non-zero process status byte.
fn exit_status_byte(code: i32) -> u8 {
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

fn config_location() -> String {
    RelayConfig::resolve_path(&|key: &str| std::env::var(key).ok())
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "~/.relay/config.yaml".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_byte_mirrors_child_code() {
        assert_eq!(exit_status_byte(3), 3);
        assert_eq!(exit_status_byte(255), 255);
    }

    #[test]
    fn test_exit_status_byte_never_reports_success() {
        assert_eq!(exit_status_byte(0), 1);
        assert_eq!(exit_status_byte(-1), 1);
        assert_eq!(exit_status_byte(256), 1);
    }
}
