//! Integration tests for the process-wide session.
//!
//! Every test takes `SESSION_LOCK` so the shared session is never used by
//! two tests at once.

use std::process::Command;

use parking_lot::Mutex;

use shell_mock::{session, CommandExt, ShellMockError};

static SESSION_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Holds the session lock and leaves the session disabled on drop.
struct EnabledSession {
    _guard: parking_lot::MutexGuard<'static, ()>,
}

impl EnabledSession {
    fn start() -> Self {
        let guard = SESSION_LOCK.lock();
        session::enable();
        Self { _guard: guard }
    }
}

impl Drop for EnabledSession {
    fn drop(&mut self) {
        session::disable();
    }
}

#[test]
fn stubbed_command_returns_canned_output() {
    let _session = EnabledSession::start();
    let stub = session::stub_command("ls").and_return("\n");

    assert!(session::system("ls").unwrap());
    assert_eq!(session::backtick("ls").unwrap(), "\n");

    assert_eq!(stub.call_count(), 2);
    let status = session::last_status().unwrap();
    assert!(status.stubbed);
    assert!(status.success());
}

#[test]
fn nonzero_exit_is_reported_as_failure() {
    let _session = EnabledSession::start();
    let _ = session::stub_command("ls").and_exit(4);

    assert!(!session::system("ls").unwrap());
    assert_eq!(session::last_status().map(|s| s.exit_code), Some(4));
}

#[test]
fn stubbing_again_changes_the_answer() {
    let _session = EnabledSession::start();
    let first = session::stub_command("ls").and_return("\n");
    assert!(session::system("ls").unwrap());
    assert_eq!(session::last_status().map(|s| s.exit_code), Some(0));

    let second = session::stub_command("ls").and_exit(4);

    assert!(!session::system("ls").unwrap());
    assert_eq!(session::last_status().map(|s| s.exit_code), Some(4));
    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 1);
}

#[test]
fn most_specific_stub_wins() {
    let _session = EnabledSession::start();
    let git = session::stub_command("git").and_return("generic\n");
    let status = session::stub_command("git status").and_return("clean\n");

    assert_eq!(session::backtick("git status --short").unwrap(), "clean\n");
    assert_eq!(session::backtick("git log").unwrap(), "generic\n");
    assert_eq!(git.call_count(), 1);
    assert_eq!(status.call_count(), 1);
}

#[test]
fn unmatched_command_is_rejected_by_default() {
    let _session = EnabledSession::start();
    let _ = session::stub_command("git status");

    assert!(session::not_letting_commands_run());
    let err = session::system("ls /").unwrap_err();
    assert!(matches!(err, ShellMockError::NoStubSpecified { ref command } if command == "ls /"));
}

#[test]
fn unmatched_command_runs_when_allowed() {
    let _session = EnabledSession::start();
    session::let_commands_run();

    assert!(session::letting_commands_run());
    assert_eq!(session::backtick("echo real").unwrap(), "real\n");
    assert_eq!(session::last_status().map(|s| s.stubbed), Some(false));

    session::dont_let_commands_run();
    assert!(session::backtick("echo real").is_err());
}

#[test]
fn disable_discards_stubs_and_policy() {
    let _guard = SESSION_LOCK.lock();
    session::enable();
    let _ = session::stub_command("echo hi").and_return("stubbed\n");
    session::let_commands_run();

    session::disable();
    session::disable();

    assert!(!session::is_enabled());
    assert!(session::global().interceptor().registry().is_empty());
    assert!(session::not_letting_commands_run());
    assert_eq!(session::backtick("echo hi").unwrap(), "hi\n");
}

#[test]
fn process_commands_are_intercepted() {
    let _session = EnabledSession::start();
    let stub = session::stub_command("git rev-parse HEAD").and_return("abc123\n").and_exit(0);

    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "HEAD"]);

    let output = cmd.intercepted_output().unwrap();
    assert_eq!(output.stdout, "abc123\n");

    let status = cmd.intercepted_status().unwrap();
    assert!(status.success());
    assert!(status.stubbed);
    assert_eq!(stub.call_count(), 2);
}

#[test]
fn env_constrained_stub_only_matches_with_env() {
    let _session = EnabledSession::start();
    let _ = session::stub_command("rake db:migrate").with_env("RAILS_ENV", "test").and_exit(0);

    let mut cmd = Command::new("rake");
    cmd.arg("db:migrate");
    assert!(cmd.intercepted_status().is_err());

    cmd.env("RAILS_ENV", "test");
    assert!(cmd.intercepted_status().unwrap().success());
}
