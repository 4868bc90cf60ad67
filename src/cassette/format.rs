//! Cassette data structures for recorded command runs.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ShellMockError};
use crate::invocation::Invocation;
use crate::ports::runner::CommandOutput;

/// One recorded command run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// The command line that was run.
    pub command: String,
    /// Environment overrides passed with the command.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Spawn options passed with the command.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
    /// Exit code the command finished with.
    #[serde(default)]
    pub exit_code: i32,
    /// Captured standard output.
    #[serde(default)]
    pub stdout: String,
    /// Captured standard error.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl Interaction {
    /// The invocation this interaction answers.
    #[must_use]
    pub fn invocation(&self) -> Invocation {
        Invocation::from_parts(self.env.clone(), self.command.clone(), self.options.clone())
    }

    /// The recorded result.
    #[must_use]
    pub fn output(&self) -> CommandOutput {
        CommandOutput {
            exit_code: self.exit_code,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

/// A cassette containing a sequence of recorded command runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Ordered list of interactions.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Creates an empty cassette stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), recorded_at: Utc::now(), interactions: Vec::new() }
    }

    /// Loads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ShellMockError::CassetteRead { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| ShellMockError::CassetteParse { path: path.to_path_buf(), source })
    }

    /// Writes the cassette to `path` as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_error =
            |message: String| ShellMockError::CassetteWrite { path: path.to_path_buf(), message };
        let yaml = serde_yaml::to_string(self).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, yaml).map_err(|e| write_error(e.to_string()))
    }
}
