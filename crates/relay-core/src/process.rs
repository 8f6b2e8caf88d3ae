//! Dispatch to an external program.
//!
//! [`ProcessDispatcher`] hands the argument vector to a child process and
//! maps the child's exit status back onto [`RelayError`]. It inherits the
//! terminal, so the child sees the same Ctrl-C as relay does.

use std::collections::BTreeMap;
use std::process::{Command, ExitStatus};

use crate::config::DispatcherConfig;
use crate::constants::SIGINT;
use crate::dispatch::Dispatcher;
use crate::errors::RelayError;

/// Runs a configured program with the forwarded argument vector.
#[derive(Debug, Clone)]
pub struct ProcessDispatcher {
    program: String,
    prefix: Vec<String>,
    forward_program_name: bool,
    interrupt_exit_codes: Vec<i32>,
    env: BTreeMap<String, String>,
}

impl ProcessDispatcher {
    /// Create a dispatcher for `program` with default settings.
    pub fn new(program: impl Into<String>) -> Self {
        let defaults = DispatcherConfig::default();
        Self {
            program: program.into(),
            prefix: defaults.args,
            forward_program_name: defaults.forward_program_name,
            interrupt_exit_codes: defaults.interrupt_exit_codes,
            env: defaults.env,
        }
    }

    /// Build a dispatcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MissingProgram`] if no program is configured.
    pub fn from_config(config: &DispatcherConfig) -> Result<Self, RelayError> {
        let program = config
            .program
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or(RelayError::MissingProgram)?;

        Ok(Self {
            program,
            prefix: config.args.clone(),
            forward_program_name: config.forward_program_name,
            interrupt_exit_codes: config.interrupt_exit_codes.clone(),
            env: config.env.clone(),
        })
    }

    /// The program this dispatcher runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the child command for `args`.
    ///
    /// The child receives the configured prefix followed by `args[1..]`.
    pub fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.prefix);
        command.args(args.iter().skip(1));
        command.envs(&self.env);

        if self.forward_program_name {
            if let Some(program_name) = args.first() {
                set_program_name(&mut command, program_name);
            }
        }

        command
    }

    /// Map a child exit status onto the dispatch result.
    pub fn classify(&self, status: ExitStatus) -> Result<(), RelayError> {
        if status.success() {
            return Ok(());
        }

        if let Some(code) = status.code() {
            if self.interrupt_exit_codes.contains(&code) {
                return Err(RelayError::Interrupted);
            }
            return Err(RelayError::ChildFailed {
                program: self.program.clone(),
                code,
            });
        }

        match termination_signal(status) {
            Some(SIGINT) => Err(RelayError::Interrupted),
            Some(signal) => Err(RelayError::ChildSignaled {
                program: self.program.clone(),
                signal,
            }),
            None => Err(RelayError::ChildFailed {
                program: self.program.clone(),
                code: 1,
            }),
        }
    }
}

#[cfg(unix)]
fn set_program_name(command: &mut Command, program_name: &str) {
    use std::os::unix::process::CommandExt;
    command.arg0(program_name);
}

#[cfg(not(unix))]
fn set_program_name(_command: &mut Command, _program_name: &str) {}

#[cfg(unix)]
fn termination_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: ExitStatus) -> Option<i32> {
    None
}

impl Dispatcher for ProcessDispatcher {
    type Error = RelayError;

    fn run(&self, args: Vec<String>) -> Result<(), Self::Error> {
        tracing::debug!(program = %self.program, ?args, "Dispatching");

        let status = self
            .command(&args)
            .status()
            .map_err(|source| RelayError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        tracing::debug!(program = %self.program, %status, "Child exited");
        self.classify(status)
    }
}
