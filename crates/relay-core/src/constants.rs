//! Common constants used throughout relay-core.
//!
//! Paths, environment variable names and exit codes live here so the CLI and
//! the library agree on them.

// ============================================================================
// Configuration locations
// ============================================================================

/// The name of the relay configuration directory under the user's home.
///
/// Located at `~/.relay/` on Unix-like systems.
pub const RELAY_HOME_DIR: &str = ".relay";

/// The configuration file name inside [`RELAY_HOME_DIR`].
pub const CONFIG_FILENAME: &str = "config.yaml";

// ============================================================================
// Environment variables
// ============================================================================

/// Overrides the configuration file path.
pub const ENV_CONFIG: &str = "RELAY_CONFIG";

/// Overrides `dispatcher.program`.
pub const ENV_PROGRAM: &str = "RELAY_PROGRAM";

/// Enables debug logging when set to a truthy value.
pub const ENV_VERBOSE: &str = "RELAY_VERBOSE";

// ============================================================================
// Exit codes
// ============================================================================

/// Status used when a user interrupt ends the process.
pub const INTERRUPT_EXIT_CODE: i32 = 0;

/// Exit code shells report for a child killed by `SIGINT` (128 + 2).
pub const SIGINT_EXIT_CODE: i32 = 130;

/// Signal number of `SIGINT` on POSIX systems.
pub const SIGINT: i32 = 2;

/// Interpret an environment flag value as a boolean.
///
/// Accepts `1`, `true`, `yes`, `on` (case-insensitive). Everything else,
/// including the empty string, is false.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
