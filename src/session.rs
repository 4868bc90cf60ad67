//! Process-wide mocking session.
//!
//! Tests that cannot thread an [`Interceptor`] through their call sites use
//! the global session through the free functions in this module:
//!
//! ```no_run
//! use shell_mock::session;
//!
//! session::enable();
//! let stub = session::stub_command("ls").and_return("\n");
//!
//! assert!(session::system("ls").unwrap());
//! assert_eq!(stub.call_count(), 1);
//!
//! session::disable();
//! ```
//!
//! The global session is shared by every thread in the process. Tests
//! running in parallel should own an [`Interceptor`] each, or serialize
//! access to the session.

use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::interceptor::{Interceptor, ProcessStatus};
use crate::invocation::Invocation;
use crate::ports::runner::{CommandOutput, CommandRunner, OutputMode};
use crate::stub::CommandStub;

static GLOBAL: Lazy<Session> = Lazy::new(Session::default);

/// An interceptor that can be switched on and off.
///
/// While disabled, every invocation goes straight to the real runner, as if
/// no interception were installed.
#[derive(Debug, Default)]
pub struct Session {
    interceptor: Interceptor,
    enabled: AtomicBool,
}

impl Session {
    /// Wraps `interceptor` in a disabled session.
    #[must_use]
    pub fn new(interceptor: Interceptor) -> Self {
        Self { interceptor, enabled: AtomicBool::new(false) }
    }

    /// Starts intercepting with an empty registry and the default policy.
    pub fn enable(&self) {
        self.interceptor.reset();
        self.enabled.store(true, Ordering::SeqCst);
        tracing::debug!("shell mocking enabled");
    }

    /// Stops intercepting and discards all stubs. Safe to call repeatedly.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.interceptor.reset();
        tracing::debug!("shell mocking disabled");
    }

    /// Returns true between [`Session::enable`] and [`Session::disable`].
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// The interceptor behind this session.
    #[must_use]
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

impl CommandRunner for Session {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        if self.is_enabled() {
            self.interceptor.run(invocation, mode)
        } else {
            self.interceptor.passthrough(invocation, mode)
        }
    }
}

/// The process-wide session.
#[must_use]
pub fn global() -> &'static Session {
    &GLOBAL
}

/// Enables the global session with an empty registry and default policy.
pub fn enable() {
    GLOBAL.enable();
}

/// Disables the global session, clearing its stubs and policy.
pub fn disable() {
    GLOBAL.disable();
}

/// Returns true while the global session is enabled.
#[must_use]
pub fn is_enabled() -> bool {
    GLOBAL.is_enabled()
}

/// Lets unmatched commands run for real.
pub fn let_commands_run() {
    GLOBAL.interceptor.policy().let_commands_run();
}

/// Makes unmatched commands fail with `NoStubSpecified`.
pub fn dont_let_commands_run() {
    GLOBAL.interceptor.policy().dont_let_commands_run();
}

/// Returns true if unmatched commands run for real.
#[must_use]
pub fn letting_commands_run() -> bool {
    GLOBAL.interceptor.policy().letting_commands_run()
}

/// Returns true if unmatched commands are rejected.
#[must_use]
pub fn not_letting_commands_run() -> bool {
    GLOBAL.interceptor.policy().not_letting_commands_run()
}

/// Registers a stub in the global session.
pub fn stub_command(pattern: &str) -> CommandStub {
    GLOBAL.interceptor.stub_command(pattern)
}

/// Runs a command with inherited output through the global session.
///
/// # Errors
///
/// Returns `NoStubSpecified` when the session is enabled, nothing matches
/// and commands may not run, or a spawn error from the real runner.
pub fn system(invocation: impl Into<Invocation>) -> Result<bool> {
    GLOBAL.system(&invocation.into())
}

/// Runs a command through the global session and returns its stdout.
///
/// # Errors
///
/// Same as [`system`].
pub fn backtick(invocation: impl Into<Invocation>) -> Result<String> {
    GLOBAL.backtick(&invocation.into())
}

/// Status of the most recent command run through the global session.
#[must_use]
pub fn last_status() -> Option<ProcessStatus> {
    GLOBAL.interceptor.last_status()
}

/// Routes a `std::process::Command` through the global session.
pub trait CommandExt {
    /// Like [`Command::status`], but answered by the session.
    ///
    /// # Errors
    ///
    /// Same as [`system`].
    fn intercepted_status(&self) -> Result<ProcessStatus>;

    /// Like [`Command::output`], but answered by the session.
    ///
    /// # Errors
    ///
    /// Same as [`system`].
    fn intercepted_output(&self) -> Result<CommandOutput>;
}

impl CommandExt for Command {
    fn intercepted_status(&self) -> Result<ProcessStatus> {
        let output = GLOBAL.run(&Invocation::from(self), OutputMode::Inherit)?;
        Ok(last_status().unwrap_or(ProcessStatus { exit_code: output.exit_code, stubbed: false }))
    }

    fn intercepted_output(&self) -> Result<CommandOutput> {
        GLOBAL.run(&Invocation::from(self), OutputMode::Capture)
    }
}
