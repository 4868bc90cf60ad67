//! Whether unmatched commands may run for real.

use std::sync::atomic::{AtomicBool, Ordering};

/// Flag consulted on every unmatched invocation.
///
/// Defaults to not letting commands run.
#[derive(Debug, Default)]
pub struct ExecutionPolicy {
    letting_commands_run: AtomicBool,
}

impl ExecutionPolicy {
    /// Creates a policy in its default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unmatched commands will be executed for real.
    pub fn let_commands_run(&self) {
        self.letting_commands_run.store(true, Ordering::SeqCst);
    }

    /// Unmatched commands will raise `NoStubSpecified`.
    pub fn dont_let_commands_run(&self) {
        self.letting_commands_run.store(false, Ordering::SeqCst);
    }

    /// Returns true if unmatched commands are executed for real.
    #[must_use]
    pub fn letting_commands_run(&self) -> bool {
        self.letting_commands_run.load(Ordering::SeqCst)
    }

    /// Returns true if unmatched commands are rejected.
    #[must_use]
    pub fn not_letting_commands_run(&self) -> bool {
        !self.letting_commands_run()
    }

    /// Restores the default state.
    pub fn reset(&self) {
        self.dont_let_commands_run();
    }
}
