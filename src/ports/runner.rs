//! Command runner port: the boundary where commands are spawned.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::invocation::Invocation;

/// What happens to a command's output streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Output goes to the caller's stdout/stderr, like `system`.
    Inherit,
    /// Output is captured and returned, like backticks.
    Capture,
}

/// The result of running (or pretending to run) a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// The exit code of the process, `-1` if it was killed by a signal.
    pub exit_code: i32,
    /// Captured standard output. Empty under [`OutputMode::Inherit`].
    #[serde(default)]
    pub stdout: String,
    /// Captured standard error. Empty under [`OutputMode::Inherit`].
    #[serde(default)]
    pub stderr: String,
}

impl CommandOutput {
    /// Returns true for exit code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Folds an exit code into the `0..=255` range a process can report.
///
/// Wraps the way shells do, so `-1` from a signal death becomes 255.
#[must_use]
pub fn exit_code_byte(code: i32) -> u8 {
    u8::try_from(code.rem_euclid(256)).unwrap_or(u8::MAX)
}

/// Spawns commands on behalf of code under test.
///
/// Production code depends on this trait; tests swap the live runner for
/// an [`Interceptor`](crate::interceptor::Interceptor).
pub trait CommandRunner: Send + Sync {
    /// Runs `invocation` and reports its exit code and any captured output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or is not allowed
    /// to run.
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput>;

    /// Runs `invocation` with inherited output and reports success.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`].
    fn system(&self, invocation: &Invocation) -> Result<bool> {
        Ok(self.run(invocation, OutputMode::Inherit)?.success())
    }

    /// Runs `invocation` and returns its captured standard output.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`].
    fn backtick(&self, invocation: &Invocation) -> Result<String> {
        Ok(self.run(invocation, OutputMode::Capture)?.stdout)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for Box<T> {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        (**self).run(invocation, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(i32);

    impl CommandRunner for Fixed {
        fn run(&self, _invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
            let stdout = if mode == OutputMode::Capture { "captured\n" } else { "" };
            Ok(CommandOutput { exit_code: self.0, stdout: stdout.into(), stderr: String::new() })
        }
    }

    #[test]
    fn system_maps_exit_code_to_bool() {
        assert!(Fixed(0).system(&Invocation::new("true")).unwrap());
        assert!(!Fixed(4).system(&Invocation::new("false")).unwrap());
    }

    #[test]
    fn backtick_returns_captured_stdout() {
        assert_eq!(Fixed(0).backtick(&Invocation::new("echo")).unwrap(), "captured\n");
    }

    #[test]
    fn exit_codes_fold_into_a_byte() {
        assert_eq!(exit_code_byte(0), 0);
        assert_eq!(exit_code_byte(42), 42);
        assert_eq!(exit_code_byte(-1), 255);
        assert_eq!(exit_code_byte(300), 44);
    }

    #[test]
    fn boxed_runner_delegates() {
        let runner: Box<dyn CommandRunner> = Box::new(Fixed(3));
        let out = runner.run(&Invocation::new("x"), OutputMode::Capture).unwrap();
        assert_eq!(out.exit_code, 3);
        assert!(!out.success());
    }
}
