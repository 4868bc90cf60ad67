//! Command dispatch and handlers.

pub mod check;
pub mod record;
pub mod run;

use crate::cli::Command;
use crate::config::MockConfig;
use crate::invocation::shell_quote;

/// Dispatch a parsed command to its handler and return the exit code to
/// report.
///
/// Settings not given on the command line come from the environment (see
/// [`crate::config`]).
///
/// # Errors
///
/// Returns an error string if the configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<u8, String> {
    let env = MockConfig::from_env().map_err(|e| e.to_string())?;

    match command {
        Command::Run { cassette, let_commands_run, shell, argv } => {
            let config = MockConfig {
                let_commands_run: *let_commands_run || env.let_commands_run,
                shell: shell.clone().unwrap_or(env.shell),
                cassette: cassette.clone().or(env.cassette),
            };
            run::run(&config, &command_line(argv))
        }
        Command::Record { cassette, name, shell, argv } => {
            let shell = shell.clone().unwrap_or(env.shell);
            record::run(cassette, name, &shell, &command_line(argv))
        }
        Command::Check { cassette } => check::run(cassette),
    }
}

/// Rebuilds the command line from trailing arguments.
///
/// A single argument is taken as a complete shell command line, so
/// `run -- "ls | wc -l"` keeps its pipe. Several arguments are quoted word
/// by word, so `run -- sh -c "echo hi; exit 2"` reaches `sh` as three words.
fn command_line(argv: &[String]) -> String {
    match argv {
        [single] => single.clone(),
        words => words.iter().map(|word| shell_quote(word)).collect::<Vec<_>>().join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["ls", "/"], "ls /")]
    #[case(&["ls | wc -l"], "ls | wc -l")]
    #[case(&["sh", "-c", "echo hi; exit 2"], "sh -c 'echo hi; exit 2'")]
    #[case(&["echo", "it's"], r"echo 'it'\''s'")]
    fn rebuilds_command_lines(#[case] argv: &[&str], #[case] expected: &str) {
        let argv: Vec<String> = argv.iter().map(|s| (*s).to_string()).collect();
        assert_eq!(command_line(&argv), expected);
    }

    #[test]
    fn quoted_words_survive_the_shell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.yaml");
        let argv: Vec<String> =
            ["sh", "-c", "echo hi; exit 2"].iter().map(|s| (*s).to_string()).collect();

        let code = record::run(&path, "quoted", "sh", &command_line(&argv)).unwrap();

        assert_eq!(code, 2);
        let cassette = crate::cassette::Cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions[0].stdout, "hi\n");
    }
}
