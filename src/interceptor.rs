//! The mock command runner.
//!
//! An [`Interceptor`] answers invocations from its [`StubRegistry`]. When
//! nothing matches, the [`ExecutionPolicy`] decides between delegating to
//! the real runner and failing with [`ShellMockError::NoStubSpecified`].

use std::io::Write;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::adapters::live::runner::LiveCommandRunner;
use crate::error::{Result, ShellMockError};
use crate::invocation::Invocation;
use crate::policy::ExecutionPolicy;
use crate::ports::runner::{CommandOutput, CommandRunner, OutputMode};
use crate::registry::StubRegistry;
use crate::stub::CommandStub;

/// Status of the most recent invocation, the analogue of a shell's `$?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStatus {
    /// Exit code reported to the caller.
    pub exit_code: i32,
    /// True if a stub answered instead of a real process.
    pub stubbed: bool,
}

impl ProcessStatus {
    /// Returns true for exit code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Mock delegate for the [`CommandRunner`] port.
pub struct Interceptor {
    registry: StubRegistry,
    policy: ExecutionPolicy,
    fallback: Box<dyn CommandRunner>,
    last_status: Mutex<Option<ProcessStatus>>,
}

impl Interceptor {
    /// Creates an interceptor that delegates allowed unmatched commands to `fallback`.
    pub fn new(fallback: impl CommandRunner + 'static) -> Self {
        Self {
            registry: StubRegistry::new(),
            policy: ExecutionPolicy::new(),
            fallback: Box::new(fallback),
            last_status: Mutex::new(None),
        }
    }

    /// The stubs this interceptor answers from.
    #[must_use]
    pub fn registry(&self) -> &StubRegistry {
        &self.registry
    }

    /// The policy applied to unmatched invocations.
    #[must_use]
    pub fn policy(&self) -> &ExecutionPolicy {
        &self.policy
    }

    /// The runner used when unmatched commands are allowed to run.
    #[must_use]
    pub fn fallback(&self) -> &dyn CommandRunner {
        self.fallback.as_ref()
    }

    /// Registers a stub for `pattern` and returns it for configuration.
    pub fn stub_command(&self, pattern: &str) -> CommandStub {
        self.registry.stub_command(pattern)
    }

    /// Status of the most recent invocation that produced one.
    ///
    /// Rejected invocations leave the previous status in place.
    #[must_use]
    pub fn last_status(&self) -> Option<ProcessStatus> {
        *self.last_status.lock()
    }

    /// Drops all stubs, restores the default policy and forgets the last status.
    pub fn reset(&self) {
        self.registry.clear();
        self.policy.reset();
        *self.last_status.lock() = None;
    }

    /// Runs `invocation` on the fallback runner, bypassing stubs and policy.
    ///
    /// # Errors
    ///
    /// Returns whatever the fallback runner returns.
    pub fn passthrough(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        let output = self.fallback.run(invocation, mode)?;
        *self.last_status.lock() = Some(ProcessStatus { exit_code: output.exit_code, stubbed: false });
        Ok(output)
    }

    fn answer_with(
        &self,
        stub: &CommandStub,
        invocation: &Invocation,
        mode: OutputMode,
    ) -> CommandOutput {
        let response = stub.apply(invocation);
        tracing::debug!(
            pattern = stub.pattern(),
            command = %invocation.command,
            exit_code = response.exit_code,
            "stub matched"
        );
        let exit_code = i32::from(response.exit_code);
        *self.last_status.lock() = Some(ProcessStatus { exit_code, stubbed: true });

        match mode {
            OutputMode::Inherit => {
                relay(&mut std::io::stdout().lock(), &response.output);
                CommandOutput { exit_code, ..CommandOutput::default() }
            }
            OutputMode::Capture => {
                CommandOutput { exit_code, stdout: response.output, stderr: String::new() }
            }
        }
    }
}

/// Writes stubbed output to an inherited stream and flushes it, so output of
/// a real process spawned afterwards on the same stream lands after it.
fn relay(out: &mut impl Write, text: &str) {
    if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        tracing::warn!(error = %err, "failed to relay stubbed output");
    }
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new(LiveCommandRunner::default())
    }
}

impl CommandRunner for Interceptor {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        if let Some(stub) = self.registry.resolve(invocation) {
            return Ok(self.answer_with(&stub, invocation, mode));
        }

        if self.policy.not_letting_commands_run() {
            tracing::warn!(command = %invocation.command, "no stub specified");
            return Err(ShellMockError::NoStubSpecified { command: invocation.command.clone() });
        }

        tracing::debug!(command = %invocation.command, "no stub matched, running for real");
        self.passthrough(invocation, mode)
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("last_status", &self.last_status())
            .finish_non_exhaustive()
    }
}
