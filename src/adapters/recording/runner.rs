//! Recording adapter for the `CommandRunner` port.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::Result;
use crate::invocation::Invocation;
use crate::ports::runner::{CommandOutput, CommandRunner, OutputMode};

/// Records command runs while delegating to an inner runner.
///
/// Only runs that produce an output are recorded; spawn failures and
/// rejected invocations are passed through untouched. Under
/// [`OutputMode::Inherit`] nothing is captured, so the recording has empty
/// output.
pub struct RecordingCommandRunner {
    inner: Box<dyn CommandRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCommandRunner {
    /// Creates a new recording runner wrapping the given implementation.
    pub fn new(inner: Box<dyn CommandRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl CommandRunner for RecordingCommandRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        let output = self.inner.run(invocation, mode)?;
        self.recorder.lock().record(invocation, &output);
        Ok(output)
    }
}
