//! Live command runner using `std::process::Command`.

use std::process::{Command, Stdio};

use crate::error::{Result, ShellMockError};
use crate::invocation::{Invocation, CHDIR_OPTION, UNSETENV_OTHERS_OPTION};
use crate::ports::runner::{CommandOutput, CommandRunner, OutputMode};

/// Default shell used to interpret command strings.
pub const DEFAULT_SHELL: &str = "sh";

/// Runs commands for real through `<shell> -c <command>`.
#[derive(Debug, Clone)]
pub struct LiveCommandRunner {
    shell: String,
}

impl LiveCommandRunner {
    /// Creates a runner that uses `shell` to interpret command strings.
    pub fn new(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }

    /// The shell program in use.
    #[must_use]
    pub fn shell(&self) -> &str {
        &self.shell
    }

    fn command_for(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&invocation.command);

        if invocation.options.get(UNSETENV_OTHERS_OPTION).and_then(serde_json::Value::as_bool)
            == Some(true)
        {
            cmd.env_clear();
        }
        cmd.envs(&invocation.env);

        if let Some(dir) = invocation.options.get(CHDIR_OPTION).and_then(serde_json::Value::as_str) {
            cmd.current_dir(dir);
        }

        for key in invocation.options.keys() {
            if key != CHDIR_OPTION && key != UNSETENV_OTHERS_OPTION {
                tracing::debug!(option = %key, "ignoring unsupported spawn option");
            }
        }
        cmd
    }
}

impl Default for LiveCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for LiveCommandRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> Result<CommandOutput> {
        let mut cmd = self.command_for(invocation);
        let spawn_error =
            |source| ShellMockError::Spawn { command: invocation.command.clone(), source };

        match mode {
            OutputMode::Inherit => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_error)?;
                Ok(CommandOutput { exit_code: status.code().unwrap_or(-1), ..CommandOutput::default() })
            }
            OutputMode::Capture => {
                let output = cmd.output().map_err(spawn_error)?;
                Ok(CommandOutput {
                    exit_code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_echo_command() {
        let runner = LiveCommandRunner::default();
        let result = runner.run(&Invocation::new("echo hello"), OutputMode::Capture).unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn captures_exit_code() {
        let runner = LiveCommandRunner::default();
        let result = runner.run(&Invocation::new("exit 42"), OutputMode::Capture).unwrap();

        assert_eq!(result.exit_code, 42);
    }

    #[test]
    fn system_shape_reports_status_only() {
        let runner = LiveCommandRunner::default();
        assert!(runner.system(&Invocation::new("true")).unwrap());
        assert!(!runner.system(&Invocation::new("exit 3")).unwrap());
    }

    #[test]
    fn applies_env_and_chdir() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("printf '%s:' \"$GREETING\"; pwd -P")
            .env("GREETING", "hi")
            .option(CHDIR_OPTION, dir.path().to_string_lossy().into_owned());

        let out = LiveCommandRunner::default().backtick(&inv).unwrap();

        let canonical = dir.path().canonicalize().unwrap();
        assert_eq!(out.trim(), format!("hi:{}", canonical.display()));
    }

    #[test]
    fn missing_shell_is_a_spawn_error() {
        let runner = LiveCommandRunner::new("/definitely/not/a/shell");
        let err = runner.run(&Invocation::new("ls"), OutputMode::Capture).unwrap_err();
        assert!(matches!(err, ShellMockError::Spawn { ref command, .. } if command == "ls"));
    }
}
