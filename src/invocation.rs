//! Normalized description of one attempt to spawn a command.

use std::collections::BTreeMap;
use std::process::Command;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option key under which the working directory of a spawn is stored.
pub const CHDIR_OPTION: &str = "chdir";

/// Option key set when the spawn starts from an empty environment.
pub const UNSETENV_OTHERS_OPTION: &str = "unsetenv_others";

/// One invocation: `(environment, command, options)`.
///
/// `env` only holds the variables the caller passed explicitly, not the
/// inherited process environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Environment overrides passed to the spawn.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// The full command line.
    pub command: String,
    /// Spawn options such as `chdir`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

impl Invocation {
    /// Creates an invocation with no environment overrides and no options.
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), ..Self::default() }
    }

    /// Builds an invocation from its three parts.
    #[must_use]
    pub fn from_parts(
        env: BTreeMap<String, String>,
        command: impl Into<String>,
        options: BTreeMap<String, Value>,
    ) -> Self {
        Self { env, command: command.into(), options }
    }

    /// Adds an environment override.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Adds a spawn option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// The command split on whitespace.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.command.split_whitespace()
    }
}

impl From<&str> for Invocation {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

impl From<String> for Invocation {
    fn from(command: String) -> Self {
        Self::new(command)
    }
}

/// Renders a `std::process::Command` the way a shell would have been given it.
///
/// Removed variables (`env_remove`) have no string value and are dropped.
impl From<&Command> for Invocation {
    fn from(cmd: &Command) -> Self {
        let mut words = vec![shell_quote(&cmd.get_program().to_string_lossy())];
        words.extend(cmd.get_args().map(|arg| shell_quote(&arg.to_string_lossy())));

        let env = cmd
            .get_envs()
            .filter_map(|(key, value)| {
                value.map(|v| {
                    (key.to_string_lossy().into_owned(), v.to_string_lossy().into_owned())
                })
            })
            .collect();

        let mut options = BTreeMap::new();
        if let Some(dir) = cmd.get_current_dir() {
            options.insert(CHDIR_OPTION.to_string(), Value::from(dir.to_string_lossy()));
        }

        Self { env, command: words.join(" "), options }
    }
}

/// Single-quotes a word when the shell would otherwise split or expand it.
pub(crate) fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_env_and_options() {
        let inv = Invocation::new("git status").env("GIT_DIR", "/repo/.git").option("chdir", "/repo");

        assert_eq!(inv.command, "git status");
        assert_eq!(inv.env.get("GIT_DIR").map(String::as_str), Some("/repo/.git"));
        assert_eq!(inv.options.get("chdir"), Some(&Value::from("/repo")));
    }

    #[test]
    fn tokens_ignore_repeated_whitespace() {
        let inv = Invocation::new("  ls   -la\t$HOME ");
        assert_eq!(inv.tokens().collect::<Vec<_>>(), ["ls", "-la", "$HOME"]);
    }

    #[test]
    fn from_std_command_quotes_and_copies_env() {
        let mut cmd = Command::new("grep");
        cmd.args(["-r", "two words", "it's"]).env("LANG", "C").current_dir("/tmp");

        let inv = Invocation::from(&cmd);

        assert_eq!(inv.command, r"grep -r 'two words' 'it'\''s'");
        assert_eq!(inv.env.get("LANG").map(String::as_str), Some("C"));
        assert_eq!(inv.options.get(CHDIR_OPTION), Some(&Value::from("/tmp")));
    }

    #[test]
    fn from_std_command_drops_removed_variables() {
        let mut cmd = Command::new("env");
        cmd.env_remove("HOME");

        let inv = Invocation::from(&cmd);

        assert!(inv.env.is_empty());
        assert!(inv.options.is_empty());
    }

    #[test]
    fn empty_argument_is_quoted() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a=b"), "a=b");
    }
}
