//! Environment-driven configuration.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SHELL_MOCK_LET_COMMANDS_RUN` | run unmatched commands for real | `false` |
//! | `SHELL_MOCK_SHELL` | shell used for real execution | `sh` |
//! | `SHELL_MOCK_CASSETTE` | cassette to install as stubs | none |
//! | `SHELL_MOCK_LOG` | `tracing` filter directive, read by the binary | `warn` |

use std::path::PathBuf;

use crate::adapters::live::runner::{LiveCommandRunner, DEFAULT_SHELL};
use crate::error::{Result, ShellMockError};
use crate::interceptor::Interceptor;

/// Name of the variable controlling the execution policy.
pub const LET_COMMANDS_RUN_VAR: &str = "SHELL_MOCK_LET_COMMANDS_RUN";
/// Name of the variable selecting the shell.
pub const SHELL_VAR: &str = "SHELL_MOCK_SHELL";
/// Name of the variable pointing at a cassette.
pub const CASSETTE_VAR: &str = "SHELL_MOCK_CASSETTE";
/// Name of the variable holding the log filter.
pub const LOG_VAR: &str = "SHELL_MOCK_LOG";

/// Default `tracing` filter.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings for building an [`Interceptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Whether unmatched commands run for real.
    pub let_commands_run: bool,
    /// Shell used by the live runner.
    pub shell: String,
    /// Cassette whose interactions become stubs.
    pub cassette: Option<PathBuf>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            let_commands_run: false,
            shell: DEFAULT_SHELL.to_string(),
            cassette: None,
        }
    }
}

impl MockConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean variable holds something unrecognized.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps variable names to values.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean variable holds something unrecognized.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let let_commands_run = match get(LET_COMMANDS_RUN_VAR) {
            Some(raw) => parse_bool(LET_COMMANDS_RUN_VAR, &raw)?,
            None => defaults.let_commands_run,
        };

        Ok(Self {
            let_commands_run,
            shell: get(SHELL_VAR).unwrap_or(defaults.shell),
            cassette: get(CASSETTE_VAR).map(PathBuf::from),
        })
    }

    /// Builds an interceptor with a live fallback, policy applied and the
    /// cassette (if any) installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded.
    pub fn build_interceptor(&self) -> Result<Interceptor> {
        let interceptor = Interceptor::new(LiveCommandRunner::new(self.shell.clone()));
        if self.let_commands_run {
            interceptor.policy().let_commands_run();
        }
        if let Some(path) = &self.cassette {
            let cassette = crate::cassette::Cassette::load(path)?;
            crate::cassette::replayer::install(&cassette, interceptor.registry());
        }
        Ok(interceptor)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ShellMockError::Config(format!("{key} must be a boolean, got {other:?}"))),
    }
}
