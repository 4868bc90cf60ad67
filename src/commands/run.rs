//! `shell-mock run` command.

use crate::config::MockConfig;
use crate::error::ShellMockError;
use crate::invocation::Invocation;
use crate::ports::runner::{exit_code_byte, CommandRunner, OutputMode};

/// Exit code reported when no stub matches and commands may not run.
pub const NO_STUB_EXIT_CODE: u8 = 127;

/// Execute the `run` command: answer `command` from the configured stubs.
///
/// Output is relayed to this process's stdout/stderr and the returned exit
/// code is the stub's (or the real command's).
///
/// # Errors
///
/// Returns an error string if the cassette cannot be loaded or the command
/// cannot be spawned.
pub fn run(config: &MockConfig, command: &str) -> Result<u8, String> {
    let interceptor = config.build_interceptor().map_err(|e| e.to_string())?;

    match interceptor.run(&Invocation::new(command), OutputMode::Capture) {
        Ok(output) => {
            print!("{}", output.stdout);
            eprint!("{}", output.stderr);
            Ok(exit_code_byte(output.exit_code))
        }
        Err(err @ ShellMockError::NoStubSpecified { .. }) => {
            eprintln!("shell-mock: {err}");
            Ok(NO_STUB_EXIT_CODE)
        }
        Err(err) => Err(err.to_string()),
    }
}
