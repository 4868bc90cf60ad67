//! Registered command stubs.
//!
//! A [`CommandStub`] is a shared handle: the registry and the test that
//! declared the stub see the same configuration and the same call ledger.
//! Cloning the handle never copies the stub.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::invocation::Invocation;
use crate::matcher::{Constraints, MatchMode, Pattern};

/// Action run synchronously every time a stub is matched.
pub type SideEffect = Arc<dyn Fn() + Send + Sync>;

/// One invocation that was answered by a stub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCall {
    /// What the caller attempted to run.
    pub invocation: Invocation,
    /// When the stub answered it.
    pub at: DateTime<Utc>,
}

/// The canned response a stub hands back to the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    /// Text returned as the command's standard output.
    pub output: String,
    /// Simulated exit status.
    pub exit_code: u8,
}

struct StubState {
    constraints: Constraints,
    mode: MatchMode,
    output: String,
    exit_code: u8,
    side_effect: Option<SideEffect>,
    limit: Option<usize>,
    calls: Vec<RecordedCall>,
}

/// A fake response for a command pattern.
#[derive(Clone)]
pub struct CommandStub {
    pattern: Arc<Pattern>,
    state: Arc<Mutex<StubState>>,
}

impl CommandStub {
    /// Creates an unregistered stub that prints nothing and exits 0.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: Arc::new(Pattern::new(pattern)),
            state: Arc::new(Mutex::new(StubState {
                constraints: Constraints::default(),
                mode: MatchMode::default(),
                output: String::new(),
                exit_code: 0,
                side_effect: None,
                limit: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Sets the text returned as the command's output.
    #[must_use]
    pub fn and_return(self, output: impl Into<String>) -> Self {
        self.state.lock().output = output.into();
        self
    }

    /// Alias of [`CommandStub::and_return`].
    #[must_use]
    pub fn returning(self, output: impl Into<String>) -> Self {
        self.and_return(output)
    }

    /// Sets the simulated exit status.
    #[must_use]
    pub fn and_exit(self, code: u8) -> Self {
        self.state.lock().exit_code = code;
        self
    }

    /// Alias of [`CommandStub::and_exit`].
    #[must_use]
    pub fn exiting_with(self, code: u8) -> Self {
        self.and_exit(code)
    }

    /// Runs `effect` every time this stub answers an invocation.
    #[must_use]
    pub fn with_side_effect(self, effect: impl Fn() + Send + Sync + 'static) -> Self {
        self.state.lock().side_effect = Some(Arc::new(effect));
        self
    }

    /// Only match invocations that pass `key=value` in their environment.
    #[must_use]
    pub fn with_env(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.state.lock().constraints.env.insert(key.into(), value.into());
        self
    }

    /// Only match invocations that pass spawn option `key` with `value`.
    #[must_use]
    pub fn with_option(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.lock().constraints.options.insert(key.into(), value.into());
        self
    }

    /// Only match the whole command, not commands that merely start with it.
    #[must_use]
    pub fn exactly(self) -> Self {
        self.state.lock().mode = MatchMode::Exact;
        self
    }

    /// Stop matching after `n` calls.
    #[must_use]
    pub fn times(self, n: usize) -> Self {
        self.state.lock().limit = Some(n);
        self
    }

    /// The pattern this stub was registered with.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The configured output.
    #[must_use]
    pub fn output(&self) -> String {
        self.state.lock().output.clone()
    }

    /// The configured exit status.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.state.lock().exit_code
    }

    /// How the pattern is compared against commands.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.state.lock().mode
    }

    /// A copy of the environment and option constraints.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        self.state.lock().constraints.clone()
    }

    /// Ranking among matching stubs; see [`Pattern::specificity`].
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.pattern.specificity()
    }

    /// Returns true if both stubs were declared for the same normalized pattern.
    #[must_use]
    pub fn same_pattern(&self, other: &CommandStub) -> bool {
        self.pattern.tokens() == other.pattern.tokens()
    }

    /// The call limit set with [`CommandStub::times`], if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.state.lock().limit
    }

    /// Returns true if this stub, registered after `earlier`, takes its place.
    ///
    /// That is the case when both have the same pattern, mode and
    /// constraints, and `earlier` has no call limit.
    #[must_use]
    pub fn supersedes(&self, earlier: &CommandStub) -> bool {
        self != earlier
            && self.same_pattern(earlier)
            && self.mode() == earlier.mode()
            && self.constraints() == earlier.constraints()
            && earlier.limit().is_none()
    }

    /// Returns true if this stub is a candidate for `invocation`.
    #[must_use]
    pub fn matches(&self, invocation: &Invocation) -> bool {
        let state = self.state.lock();
        if state.limit.is_some_and(|limit| state.calls.len() >= limit) {
            return false;
        }
        self.pattern.matches(invocation.tokens(), state.mode)
            && state.constraints.satisfied_by(invocation)
    }

    /// Records `invocation`, runs the side effect and returns the response.
    ///
    /// The side effect runs after the call is recorded and without holding
    /// the stub's lock, so it may inspect this stub.
    pub fn apply(&self, invocation: &Invocation) -> StubResponse {
        let (response, effect) = {
            let mut state = self.state.lock();
            state.calls.push(RecordedCall { invocation: invocation.clone(), at: Utc::now() });
            let response =
                StubResponse { output: state.output.clone(), exit_code: state.exit_code };
            (response, state.side_effect.clone())
        };
        if let Some(effect) = effect {
            effect();
        }
        response
    }

    /// Every invocation this stub answered, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Number of invocations this stub answered.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Returns true if the stub answered at least one invocation.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// The most recent invocation answered by this stub.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.state.lock().calls.last().cloned()
    }
}

/// Two handles are equal when they refer to the same registered stub.
impl PartialEq for CommandStub {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for CommandStub {}

impl fmt::Debug for CommandStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CommandStub")
            .field("pattern", &self.pattern.as_str())
            .field("mode", &state.mode)
            .field("constraints", &state.constraints)
            .field("output", &state.output)
            .field("exit_code", &state.exit_code)
            .field("limit", &state.limit)
            .field("calls", &state.calls.len())
            .finish_non_exhaustive()
    }
}
