//! Collection of registered stubs and the best-match resolution.

use parking_lot::Mutex;

use crate::invocation::Invocation;
use crate::stub::CommandStub;

/// Insertion-ordered set of stubs for one mocking session.
#[derive(Debug, Default)]
pub struct StubRegistry {
    stubs: Mutex<Vec<CommandStub>>,
}

impl StubRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stub. Duplicate patterns are kept; see
    /// [`StubRegistry::resolve`] for which of them answers.
    pub fn register(&self, stub: CommandStub) -> CommandStub {
        tracing::trace!(pattern = stub.pattern(), "registering stub");
        self.stubs.lock().push(stub.clone());
        stub
    }

    /// Creates, registers and returns a stub for `pattern`.
    pub fn stub_command(&self, pattern: &str) -> CommandStub {
        self.register(CommandStub::new(pattern))
    }

    /// Returns the most specific stub matching `invocation`.
    ///
    /// Ties go to the stub registered first, except that a later stub with
    /// the same pattern, mode and constraints supersedes an earlier one
    /// without a call limit. Stubbing a command again therefore changes its
    /// answer, while limited stubs stay queued ahead of later ones. `None`
    /// means the invocation is unmatched, which is not an error at this level.
    #[must_use]
    pub fn resolve(&self, invocation: &Invocation) -> Option<CommandStub> {
        let stubs = self.stubs.lock();
        let mut best: Option<&CommandStub> = None;
        for stub in stubs.iter() {
            if !stub.matches(invocation) {
                continue;
            }
            tracing::trace!(
                pattern = stub.pattern(),
                specificity = stub.specificity(),
                command = %invocation.command,
                "candidate stub"
            );
            let wins = best.is_none_or(|current| {
                stub.specificity() > current.specificity()
                    || (stub.specificity() == current.specificity() && stub.supersedes(current))
            });
            if wins {
                best = Some(stub);
            }
        }
        best.cloned()
    }

    /// Removes every stub.
    pub fn clear(&self) {
        self.stubs.lock().clear();
    }

    /// A snapshot of the registered stubs in registration order.
    #[must_use]
    pub fn stubs(&self) -> Vec<CommandStub> {
        self.stubs.lock().clone()
    }

    /// Number of registered stubs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stubs.lock().len()
    }

    /// Returns true when no stub is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stubs.lock().is_empty()
    }
}
