//! Shared test utilities for relay-cli integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command;

/// Get a Command for the relay binary with a clean relay environment.
///
/// `config` is exported as `RELAY_CONFIG` so the user's home directory is
/// never read.
///
/// # Panics
///
/// Panics if the relay binary cannot be found. This should not happen
/// in a properly configured test environment.
#[allow(deprecated)]
pub fn relay_cmd(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("relay").expect("relay binary should exist");
    cmd.env_remove("RELAY_PROGRAM")
        .env_remove("RELAY_VERBOSE")
        .env("RELAY_CONFIG", config)
        .env("NO_COLOR", "1");
    cmd
}

/// Like [`relay_cmd`], but a plain `std::process::Command` for tests that
/// need the child's pid while it runs.
#[allow(deprecated)]
pub fn relay_process(config: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::cargo_bin("relay").expect("relay binary should exist");
    cmd.env_remove("RELAY_PROGRAM")
        .env_remove("RELAY_VERBOSE")
        .env("RELAY_CONFIG", config)
        .env("NO_COLOR", "1");
    cmd
}

/// Write a config that dispatches to `sh -c <script> sh <forwarded args...>`.
///
/// `extra` is appended verbatim under the `dispatcher:` key.
pub fn write_sh_config(dir: &Path, script: &str, extra: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let yaml = format!(
        "dispatcher:\n  program: sh\n  forwardProgramName: false\n  args:\n    - \"-c\"\n    - |-\n      {}\n    - sh\n{}",
        script, extra
    );
    fs::write(&path, yaml).expect("write config");
    path
}
