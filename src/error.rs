//! Error type shared by the library and the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ShellMockError> = std::result::Result<T, E>;

/// Errors raised while intercepting commands or handling cassettes.
#[derive(Debug, Error)]
pub enum ShellMockError {
    /// No stub matched the invocation and the policy forbids real execution.
    ///
    /// The command was never run.
    #[error("no stub specified for command: {command}")]
    NoStubSpecified {
        /// The command string that was attempted.
        command: String,
    },

    /// The real spawn primitive could not start the process.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// The command that failed to start.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A cassette file could not be read.
    #[error("failed to read cassette file {}: {source}", path.display())]
    CassetteRead {
        /// Path of the cassette.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A cassette file did not contain valid cassette YAML.
    #[error("failed to parse cassette file {}: {source}", path.display())]
    CassetteParse {
        /// Path of the cassette.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A cassette could not be serialized or written to disk.
    #[error("failed to write cassette file {}: {message}", path.display())]
    CassetteWrite {
        /// Path of the cassette.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// A configuration value was malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ShellMockError {
    /// Returns the offending command if this is a [`ShellMockError::NoStubSpecified`].
    #[must_use]
    pub fn unmatched_command(&self) -> Option<&str> {
        match self {
            Self::NoStubSpecified { command } => Some(command),
            _ => None,
        }
    }
}
