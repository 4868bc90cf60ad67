//! Stub out external shell commands in tests.
//!
//! Code that shells out goes through the [`CommandRunner`] port. In
//! production that is a [`LiveCommandRunner`]; in tests it is an
//! [`Interceptor`] holding registered [`CommandStub`]s:
//!
//! ```
//! use shell_mock::{CommandRunner, Interceptor, Invocation};
//!
//! let mock = Interceptor::default();
//! let stub = mock.stub_command("git rev-parse HEAD").and_return("abc123\n");
//!
//! let head = mock.backtick(&Invocation::new("git rev-parse HEAD")).unwrap();
//! assert_eq!(head, "abc123\n");
//! assert_eq!(stub.call_count(), 1);
//!
//! // Unmatched commands are refused unless the policy lets them run.
//! assert!(mock.system(&Invocation::new("rm -rf /")).is_err());
//! ```
//!
//! Code that cannot be handed a runner can use the process-wide
//! [`session`] instead.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod invocation;
pub mod matcher;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod session;
pub mod stub;

pub use adapters::live::runner::LiveCommandRunner;
pub use adapters::recording::runner::RecordingCommandRunner;
pub use error::{Result, ShellMockError};
pub use interceptor::{Interceptor, ProcessStatus};
pub use invocation::Invocation;
pub use matcher::MatchMode;
pub use policy::ExecutionPolicy;
pub use ports::runner::{CommandOutput, CommandRunner, OutputMode};
pub use registry::StubRegistry;
pub use session::CommandExt;
pub use stub::{CommandStub, RecordedCall};

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments and return the exit code.
///
/// `--help` and `--version` print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<u8, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().map_err(|e| e.to_string())?;
            return Ok(0);
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_check_on_missing_file() {
        let result = run(["shell-mock", "check", "/no/such/cassette.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_and_version_succeed() {
        assert_eq!(run(["shell-mock", "--help"]), Ok(0));
        assert_eq!(run(["shell-mock", "--version"]), Ok(0));
        assert_eq!(run(["shell-mock", "run", "--help"]), Ok(0));
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["shell-mock", "unknown"]);
        assert!(result.is_err());
    }
}
