//! Error types for relay-core.

use thiserror::Error;

use crate::interrupt::Interrupt;

/// Errors raised while configuring or running a dispatch.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The user interrupted the dispatch (Ctrl-C / `SIGINT`).
    ///
    /// The launcher turns this into exit status 0; it never reaches a
    /// caller of `Launcher::entry`.
    #[error("Interrupted by user")]
    Interrupted,

    /// The configuration file could not be read or parsed.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// No dispatcher program was configured.
    #[error("No dispatcher program configured")]
    MissingProgram,

    /// The dispatcher program could not be started.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The dispatcher program exited with a non-zero status.
    #[error("`{program}` exited with status {code}")]
    ChildFailed {
        /// The program that failed.
        program: String,
        /// Its exit code.
        code: i32,
    },

    /// The dispatcher program was killed by a signal other than `SIGINT`.
    #[error("`{program}` was terminated by signal {signal}")]
    ChildSignaled {
        /// The program that was killed.
        program: String,
        /// The signal number.
        signal: i32,
    },
}

impl Interrupt for RelayError {
    fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// An `anyhow` error is an interrupt when it wraps [`RelayError::Interrupted`].
impl Interrupt for anyhow::Error {
    fn is_interrupt(&self) -> bool {
        self.downcast_ref::<RelayError>()
            .is_some_and(|e| e.is_interrupt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_interrupted_is_interrupt() {
        assert!(RelayError::Interrupted.is_interrupt());
        assert!(!RelayError::MissingProgram.is_interrupt());
        assert!(!RelayError::ChildFailed {
            program: "tool".to_string(),
            code: 130,
        }
        .is_interrupt());
    }

    #[test]
    fn test_anyhow_wrapped_interrupt() {
        let err = anyhow::Error::from(RelayError::Interrupted);
        assert!(err.is_interrupt());

        let err = anyhow::Error::from(RelayError::Interrupted).context("dispatch failed");
        assert!(err.is_interrupt());

        let err = anyhow::anyhow!("disk full");
        assert!(!err.is_interrupt());
    }

    #[test]
    fn test_child_failed_message() {
        let err = RelayError::ChildFailed {
            program: "tool".to_string(),
            code: 3,
        };
        assert_eq!(err.to_string(), "`tool` exited with status 3");
    }
}
