//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `shell-mock`.
#[derive(Debug, Parser)]
#[command(name = "shell-mock", version, about = "Answer shell commands from recorded stubs")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a command from a cassette instead of running it.
    Run {
        /// Cassette whose interactions are installed as stubs.
        #[arg(long)]
        cassette: Option<PathBuf>,
        /// Run the command for real when no stub matches.
        #[arg(long)]
        let_commands_run: bool,
        /// Shell used when a command runs for real.
        #[arg(long)]
        shell: Option<String>,
        /// The command line to answer.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
    /// Run a command for real and append the result to a cassette.
    Record {
        /// Cassette to append to; created if missing.
        #[arg(long)]
        cassette: PathBuf,
        /// Name stored in a newly created cassette.
        #[arg(long, default_value = "shell-mock")]
        name: String,
        /// Shell used to run the command.
        #[arg(long)]
        shell: Option<String>,
        /// The command line to run.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        argv: Vec<String>,
    },
    /// List the stubs a cassette would install.
    Check {
        /// Cassette file to inspect.
        cassette: PathBuf,
    },
}
