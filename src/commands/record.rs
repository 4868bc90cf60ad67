//! `shell-mock record` command.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::adapters::live::runner::LiveCommandRunner;
use crate::adapters::recording::runner::RecordingCommandRunner;
use crate::cassette::recorder::CassetteRecorder;
use crate::invocation::Invocation;
use crate::ports::runner::{exit_code_byte, CommandRunner, OutputMode};

/// Execute the `record` command: run `command` for real, relay its output
/// and append the run to the cassette at `path`.
///
/// # Errors
///
/// Returns an error string if the cassette cannot be read or written, or the
/// command cannot be spawned.
pub fn run(path: &Path, name: &str, shell: &str, command: &str) -> Result<u8, String> {
    let recorder = Arc::new(Mutex::new(
        CassetteRecorder::append_to(path, name).map_err(|e| e.to_string())?,
    ));

    let output = {
        let runner = RecordingCommandRunner::new(
            Box::new(LiveCommandRunner::new(shell)),
            Arc::clone(&recorder),
        );
        runner.run(&Invocation::new(command), OutputMode::Capture).map_err(|e| e.to_string())?
    };

    let recorder = Arc::try_unwrap(recorder)
        .map_err(|_| "Recording runner still has references".to_string())?
        .into_inner();
    recorder.finish().map_err(|e| e.to_string())?;

    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    Ok(exit_code_byte(output.exit_code))
}
