//! Integration tests for the `relay` binary.
//!
//! These tests drive the real binary against `sh`:
//! - Argument forwarding (including the empty command line)
//! - Exit code mirroring for failing children
//! - Ctrl-C, either killing the child or reaching relay itself, exits 0
//! - Configuration and spawn errors

#![cfg(unix)]

mod common;

use predicates::prelude::*;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use common::{relay_cmd, relay_process, write_sh_config};

const PRINT_ARGS: &str = r#"for a in "$@"; do echo "$a"; done"#;

// ============================================================================
// Forwarding
// ============================================================================

#[test]
fn test_forwards_arguments_unchanged() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), PRINT_ARGS, "");

    relay_cmd(&config)
        .args(["build", "--release", "two words"])
        .assert()
        .success()
        .stdout("build\n--release\ntwo words\n")
        .stderr("");
}

#[test]
fn test_empty_command_line() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), PRINT_ARGS, "");

    relay_cmd(&config).assert().success().stdout("");
}

#[test]
fn test_dispatcher_env_is_passed() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(
        temp.path(),
        r#"echo "mode=$RELAY_TEST_MODE""#,
        "  env:\n    RELAY_TEST_MODE: relay\n",
    );

    relay_cmd(&config)
        .assert()
        .success()
        .stdout("mode=relay\n");
}

#[test]
fn test_env_program_overrides_config() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), "exit 0", "");

    // The configured script succeeds; `false` ignores the prefix and fails.
    relay_cmd(&config)
        .env("RELAY_PROGRAM", "false")
        .assert()
        .code(1)
        .stderr("");
}

// ============================================================================
// Exit codes
// ============================================================================

#[test]
fn test_child_exit_code_is_mirrored() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), "echo failing >&2; exit 3", "");

    relay_cmd(&config)
        .arg("build")
        .assert()
        .code(3)
        .stderr("failing\n");
}

// ============================================================================
// Interrupts
// ============================================================================

#[test]
fn test_child_killed_by_sigint_exits_zero() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), "kill -INT $$; sleep 5", "");

    relay_cmd(&config)
        .arg("preview")
        .assert()
        .success()
        .stderr("");
}

#[test]
fn test_child_interrupt_exit_code_exits_zero() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), "exit 130", "");

    relay_cmd(&config).assert().success().stderr("");
}

#[test]
fn test_custom_interrupt_exit_code() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), "exit 42", "  interruptExitCodes: [42]\n");

    relay_cmd(&config).assert().success();
}

#[test]
fn test_sigint_to_relay_exits_zero_immediately() {
    let temp = TempDir::new().expect("create temp dir");
    // Detach the child's output so relay's pipes close when relay exits,
    // then interrupt relay (the child's parent) and outlive it.
    let config = write_sh_config(
        temp.path(),
        "exec >/dev/null 2>&1; kill -INT $PPID; sleep 3; exit 7",
        "",
    );

    let started = Instant::now();
    relay_cmd(&config)
        .timeout(Duration::from_secs(10))
        .assert()
        .success();
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "relay should exit before the child finishes"
    );
}

#[test]
fn test_sigint_during_config_load_exits_zero() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("config.yaml");
    let marker = temp.path().join("dispatched");

    // relay blocks opening the fifo until a writer shows up.
    let status = Command::new("mkfifo")
        .arg(&config)
        .status()
        .expect("run mkfifo");
    assert!(status.success());

    let mut relay = relay_process(&config)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn relay");
    thread::sleep(Duration::from_millis(500));

    let status = Command::new("kill")
        .args(["-INT", &relay.id().to_string()])
        .status()
        .expect("run kill");
    assert!(status.success());

    let yaml = format!(
        "dispatcher:\n  program: touch\n  forwardProgramName: false\n  args: [\"{}\"]\n",
        marker.display()
    );
    let mut writer = Command::new("sh")
        .args(["-c", r#"printf '%s' "$1" > "$2""#, "sh"])
        .arg(&yaml)
        .arg(&config)
        .spawn()
        .expect("spawn config writer");

    let status = relay.wait().expect("wait for relay");
    let _ = writer.kill();
    let _ = writer.wait();

    assert_eq!(status.code(), Some(0), "relay status: {:?}", status);
    assert!(!marker.exists(), "nothing should be dispatched after Ctrl-C");
}

// ============================================================================
// relay's own failures
// ============================================================================

#[test]
fn test_missing_program_reports_hint() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("absent.yaml");

    relay_cmd(&config)
        .arg("build")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[err] No dispatcher program configured"))
        .stderr(predicate::str::contains("RELAY_PROGRAM"));
}

#[test]
fn test_invalid_config_reports_error() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("config.yaml");
    std::fs::write(&config, "dispatcher: [not: valid").expect("write config");

    relay_cmd(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("[err] Failed to load configuration"))
        .stderr(predicate::str::contains("Cause:"));
}

#[test]
fn test_unknown_program_reports_spawn_failure() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("absent.yaml");

    relay_cmd(&config)
        .env("RELAY_PROGRAM", "relay-test-no-such-program")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "[err] Dispatch to `relay-test-no-such-program` failed",
        ))
        .stderr(predicate::str::contains("Failed to start"));
}

#[test]
fn test_missing_explicit_config_warns() {
    let temp = TempDir::new().expect("create temp dir");
    let config = temp.path().join("typo.yaml");

    relay_cmd(&config)
        .env("RELAY_PROGRAM", "true")
        .assert()
        .success()
        .stderr(predicate::str::contains("RELAY_CONFIG points at"))
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let temp = TempDir::new().expect("create temp dir");
    let config = write_sh_config(temp.path(), PRINT_ARGS, "");

    relay_cmd(&config)
        .env("RELAY_VERBOSE", "1")
        .arg("check")
        .assert()
        .success()
        .stdout("check\n")
        .stderr(predicate::str::contains("Dispatching"));
}
