//! Binary entrypoint for the `shell-mock` CLI.

use std::process::ExitCode;

use shell_mock::config::{DEFAULT_LOG_FILTER, LOG_VAR};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // A missing .env file is fine; settings then come from the real environment.
    let _ = dotenvy::dotenv();
    init_logging();

    match shell_mock::run(std::env::args()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so relayed command output on stdout stays clean.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
