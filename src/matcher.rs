//! Command pattern matching.
//!
//! Patterns and commands are compared as whitespace-separated token
//! sequences. A pattern matches a command when its tokens are a prefix of
//! the command's tokens, so `ls` matches `ls` and `ls $HOME` but never
//! `lsx`. Among matching stubs the one with the longest pattern wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::invocation::Invocation;

/// How a pattern is compared against a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Pattern tokens must be a prefix of the command tokens.
    #[default]
    Prefix,
    /// Pattern tokens must equal the command tokens.
    Exact,
}

/// A normalized command pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    tokens: Vec<String>,
}

impl Pattern {
    /// Parses a pattern string.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let tokens: Vec<String> = raw.split_whitespace().map(String::from).collect();
        Self { raw: raw.to_string(), tokens }
    }

    /// The pattern as it was registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The whitespace-separated tokens of the pattern.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns true if the pattern covers `command` under `mode`.
    pub fn matches<'a>(&self, command: impl IntoIterator<Item = &'a str>, mode: MatchMode) -> bool {
        let mut command = command.into_iter();
        for token in &self.tokens {
            match command.next() {
                Some(word) if word == token => {}
                _ => return false,
            }
        }
        match mode {
            MatchMode::Prefix => true,
            MatchMode::Exact => command.next().is_none(),
        }
    }

    /// Ranking used to pick the most qualified pattern.
    ///
    /// This is the length of the normalized pattern, so repeated whitespace
    /// in the registered string does not inflate it.
    #[must_use]
    pub fn specificity(&self) -> usize {
        let chars: usize = self.tokens.iter().map(String::len).sum();
        chars + self.tokens.len().saturating_sub(1)
    }
}

/// Environment and option requirements attached to a stub.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Environment variables that must be passed with these values.
    pub env: BTreeMap<String, String>,
    /// Spawn options that must be passed with these values.
    pub options: BTreeMap<String, Value>,
}

impl Constraints {
    /// Returns true when every constraint is satisfied by `invocation`.
    #[must_use]
    pub fn satisfied_by(&self, invocation: &Invocation) -> bool {
        self.env.iter().all(|(k, v)| invocation.env.get(k) == Some(v))
            && self.options.iter().all(|(k, v)| invocation.options.get(k) == Some(v))
    }

    /// Returns true when there are no constraints at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.env.is_empty() && self.options.is_empty()
    }
}
