//! Records command runs into a cassette file.

use std::path::PathBuf;

use super::format::{Cassette, Interaction};
use crate::error::Result;
use crate::invocation::Invocation;
use crate::ports::runner::CommandOutput;

/// Accumulates interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { path: path.into(), cassette: Cassette::new(name) }
    }

    /// Continue recording onto an existing cassette, or start a new one if
    /// `path` does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` exists but cannot be read or parsed.
    pub fn append_to(path: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::new(path, name));
        }
        let cassette = Cassette::load(&path)?;
        Ok(Self { path, cassette })
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    pub fn record(&mut self, invocation: &Invocation, output: &CommandOutput) {
        let seq = self.cassette.interactions.last().map_or(0, |last| last.seq + 1);
        self.cassette.interactions.push(Interaction {
            seq,
            command: invocation.command.clone(),
            env: invocation.env.clone(),
            options: invocation.options.clone(),
            exit_code: output.exit_code,
            stdout: output.stdout.clone(),
            stderr: output.stderr.clone(),
        });
    }

    /// Number of interactions recorded so far, including appended-to ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cassette.interactions.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cassette.interactions.is_empty()
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf> {
        self.cassette.save(&self.path)?;
        tracing::debug!(
            path = %self.path.display(),
            interactions = self.cassette.interactions.len(),
            "cassette written"
        );
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(exit_code: i32, stdout: &str) -> CommandOutput {
        CommandOutput { exit_code, stdout: stdout.into(), stderr: String::new() }
    }

    #[test]
    fn record_and_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording");
        recorder.record(&Invocation::new("ls"), &output(0, "a\nb\n"));
        recorder.record(&Invocation::new("ls /nope"), &output(2, ""));
        recorder.record(&Invocation::new("env").env("A", "1"), &output(0, "A=1\n"));

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.interactions.len(), 3);
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[1].seq, 1);
        assert_eq!(cassette.interactions[2].seq, 2);
        assert_eq!(cassette.interactions[1].exit_code, 2);
        assert_eq!(cassette.interactions[2].env.get("A").map(String::as_str), Some("1"));
    }

    #[test]
    fn append_continues_sequence_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append.cassette.yaml");

        let mut first = CassetteRecorder::append_to(&path, "session").unwrap();
        assert!(first.is_empty());
        first.record(&Invocation::new("date"), &output(0, "Mon\n"));
        first.finish().unwrap();

        let mut second = CassetteRecorder::append_to(&path, "ignored").unwrap();
        assert_eq!(second.len(), 1);
        second.record(&Invocation::new("date"), &output(0, "Tue\n"));
        second.finish().unwrap();

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "session");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, [0, 1]);
    }
}
