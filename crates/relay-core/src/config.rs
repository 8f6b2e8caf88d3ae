//! Configuration types for relay.
//!
//! - [`RelayConfig`]: user-level configuration stored in `~/.relay/config.yaml`
//! - [`DispatcherConfig`]: the external program commands are dispatched to
//! - [`LogConfig`]: default log level for the binary
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`RELAY_PROGRAM`)
//! 2. Config file (`$RELAY_CONFIG` or `~/.relay/config.yaml`)
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILENAME, ENV_CONFIG, ENV_PROGRAM, RELAY_HOME_DIR, SIGINT_EXIT_CODE};
use crate::errors::RelayError;

/// Log levels accepted in `log.level`.
pub const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

// ============================================================================
// RelayConfig
// ============================================================================

/// User-level configuration for relay.
///
/// # Example YAML
///
/// ```yaml
/// dispatcher:
///   program: my-tool
///   args: ["--from-relay"]
///   forwardProgramName: true
///   interruptExitCodes: [130]
///   env:
///     MY_TOOL_MODE: relay
/// log:
///   level: warn
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// The external program that receives the argument vector.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Logging defaults.
    #[serde(default)]
    pub log: LogConfig,
}

impl RelayConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads the file named by `RELAY_CONFIG` (or the default path), then
    /// applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if the file exists but cannot be
    /// parsed, or [`RelayError::InvalidConfiguration`] if validation fails.
    pub fn load() -> Result<Self, RelayError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of `std::env::var`.
    pub fn load_with<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = Self::missing_env_path(&lookup) {
            tracing::warn!("{} points at {}, which does not exist", ENV_CONFIG, path.display());
        }

        let mut config = match Self::resolve_path(&lookup) {
            Some(path) => Self::from_path(&path)?,
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Self::default()
            }
        };

        config.apply_overrides(&lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from a specific path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if the file exists but cannot be parsed.
    /// Returns [`RelayError::InvalidConfiguration`] if validation fails.
    pub fn from_path(path: &Path) -> Result<Self, RelayError> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RelayError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            RelayError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Get the default config directory (`~/.relay`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(RELAY_HOME_DIR))
    }

    /// Get the default config file path (`~/.relay/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join(CONFIG_FILENAME))
    }

    /// The config path in effect: `RELAY_CONFIG` if set, else the default.
    pub fn resolve_path<F>(lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::env_path(lookup).or_else(Self::default_path)
    }

    /// The path named by `RELAY_CONFIG`, if it is set but the file is missing.
    ///
    /// A missing default file is normal; a missing explicit one is usually a typo.
    pub fn missing_env_path<F>(lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::env_path(lookup).filter(|path| !path.exists())
    }

    fn env_path<F>(lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(ENV_CONFIG)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(program) = lookup(ENV_PROGRAM).filter(|p| !p.trim().is_empty()) {
            tracing::debug!("Env override: dispatcher.program = {}", program);
            self.dispatcher.program = Some(program);
        }
    }

    /// Validate the configuration.
    ///
    /// Returns non-fatal warnings, or the first fatal problem as
    /// [`RelayError::InvalidConfiguration`].
    pub fn validate(&self) -> Result<Vec<String>, RelayError> {
        let mut warnings = self.dispatcher.validate()?;
        warnings.extend(self.log.validate());
        Ok(warnings)
    }
}

// ============================================================================
// DispatcherConfig
// ============================================================================

/// The external program the argument vector is handed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherConfig {
    /// Program to run. Looked up on `PATH` when not a path.
    #[serde(default)]
    pub program: Option<String>,

    /// Arguments placed before the forwarded vector.
    #[serde(default)]
    pub args: Vec<String>,

    /// Pass element 0 of the vector as the child's own `argv[0]` (Unix only).
    #[serde(default = "default_forward_program_name")]
    pub forward_program_name: bool,

    /// Child exit codes that mean the child was interrupted by the user.
    #[serde(default = "default_interrupt_exit_codes")]
    pub interrupt_exit_codes: Vec<i32>,

    /// Extra environment variables for the child.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_forward_program_name() -> bool {
    true
}

fn default_interrupt_exit_codes() -> Vec<i32> {
    vec![SIGINT_EXIT_CODE]
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            forward_program_name: default_forward_program_name(),
            interrupt_exit_codes: default_interrupt_exit_codes(),
            env: BTreeMap::new(),
        }
    }
}

impl DispatcherConfig {
    /// Create a config that runs `program` with default settings.
    pub fn for_program(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
            ..Self::default()
        }
    }

    /// Add fixed arguments placed before the forwarded vector.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Validate dispatcher settings.
    pub fn validate(&self) -> Result<Vec<String>, RelayError> {
        let mut warnings = Vec::new();

        if let Some(program) = &self.program {
            if program.trim().is_empty() {
                return Err(RelayError::InvalidConfiguration {
                    message: "dispatcher.program is empty".to_string(),
                    hint: "Set it to a program name or path, or remove the key".to_string(),
                });
            }
        }

        if self.interrupt_exit_codes.contains(&0) {
            return Err(RelayError::InvalidConfiguration {
                message: "dispatcher.interruptExitCodes contains 0".to_string(),
                hint: "Exit code 0 means success and cannot signal an interrupt".to_string(),
            });
        }

        if self.interrupt_exit_codes.is_empty() {
            warnings.push(
                "dispatcher.interruptExitCodes is empty; only signal deaths count as interrupts"
                    .to_string(),
            );
        }

        if cfg!(not(unix)) && self.forward_program_name {
            warnings.push(
                "dispatcher.forwardProgramName has no effect on this platform".to_string(),
            );
        }

        Ok(warnings)
    }
}

// ============================================================================
// LogConfig
// ============================================================================

/// Logging defaults for the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level for relay's own targets. One of [`LOG_LEVELS`].
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LogConfig {
    /// The level to use, falling back to `warn` for unknown values.
    pub fn effective_level(&self) -> &str {
        let level = self.level.as_str();
        if LOG_LEVELS.contains(&level) {
            level
        } else {
            "warn"
        }
    }

    fn validate(&self) -> Vec<String> {
        if LOG_LEVELS.contains(&self.level.as_str()) {
            Vec::new()
        } else {
            vec![format!(
                "log.level `{}` is not one of {}; using `warn`",
                self.level,
                LOG_LEVELS.join(", ")
            )]
        }
    }
}
