//! Replays a cassette by installing its interactions as stubs.

use super::format::{Cassette, Interaction};
use crate::ports::runner::exit_code_byte;
use crate::registry::StubRegistry;
use crate::stub::CommandStub;

/// Registers one exact-match stub per interaction in `cassette`.
///
/// A command recorded several times is answered with its recordings in
/// order: every recording but the last is good for a single call, and the
/// last one keeps answering once the others are used up.
pub fn install(cassette: &Cassette, registry: &StubRegistry) -> Vec<CommandStub> {
    let interactions = &cassette.interactions;
    interactions
        .iter()
        .enumerate()
        .map(|(idx, interaction)| {
            let repeated_later = interactions[idx + 1..].iter().any(|later| same_call(interaction, later));
            let stub = stub_for(interaction);
            let stub = if repeated_later { stub.times(1) } else { stub };
            registry.register(stub)
        })
        .collect()
}

fn stub_for(interaction: &Interaction) -> CommandStub {
    let mut stub = CommandStub::new(&interaction.command)
        .exactly()
        .and_return(interaction.stdout.clone())
        .and_exit(exit_code_byte(interaction.exit_code));
    for (key, value) in &interaction.env {
        stub = stub.with_env(key.clone(), value.clone());
    }
    for (key, value) in &interaction.options {
        stub = stub.with_option(key.clone(), value.clone());
    }
    stub
}

fn same_call(a: &Interaction, b: &Interaction) -> bool {
    a.command.split_whitespace().eq(b.command.split_whitespace())
        && a.env == b.env
        && a.options == b.options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::Invocation;
    use crate::matcher::MatchMode;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn interaction(seq: u64, command: &str, stdout: &str, exit_code: i32) -> Interaction {
        Interaction {
            seq,
            command: command.into(),
            env: BTreeMap::new(),
            options: BTreeMap::new(),
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), interactions }
    }

    #[test]
    fn installs_exact_stubs_with_recorded_results() {
        let registry = StubRegistry::new();
        let cassette = make_cassette(vec![
            interaction(0, "git rev-parse HEAD", "abc\n", 0),
            interaction(1, "git status --porcelain", "", 1),
        ]);

        let stubs = install(&cassette, &registry);

        assert_eq!(stubs.len(), 2);
        assert_eq!(registry.len(), 2);
        assert!(stubs.iter().all(|s| s.mode() == MatchMode::Exact));
        assert_eq!(stubs[0].output(), "abc\n");
        assert_eq!(stubs[1].exit_code(), 1);
        assert!(registry.resolve(&Invocation::new("git rev-parse HEAD~1")).is_none());
    }

    #[test]
    fn repeated_commands_replay_in_order() {
        let registry = StubRegistry::new();
        let cassette = make_cassette(vec![
            interaction(0, "date", "Mon\n", 0),
            interaction(1, "whoami", "root\n", 0),
            interaction(2, "date", "Tue\n", 0),
        ]);
        install(&cassette, &registry);
        let date = Invocation::new("date");

        let answers: Vec<String> = (0..3)
            .map(|_| registry.resolve(&date).expect("date stub").apply(&date).output)
            .collect();

        assert_eq!(answers, ["Mon\n", "Tue\n", "Tue\n"]);
    }

    #[test]
    fn recorded_env_becomes_a_constraint() {
        let registry = StubRegistry::new();
        let mut scoped = interaction(0, "rake", "ok\n", 0);
        scoped.env.insert("RAILS_ENV".into(), "test".into());
        install(&make_cassette(vec![scoped]), &registry);

        assert!(registry.resolve(&Invocation::new("rake")).is_none());
        assert!(registry.resolve(&Invocation::new("rake").env("RAILS_ENV", "test")).is_some());
    }

    #[test]
    fn signal_deaths_replay_as_255() {
        let registry = StubRegistry::new();
        let stubs = install(&make_cassette(vec![interaction(0, "sleep 100", "", -1)]), &registry);
        assert_eq!(stubs[0].exit_code(), 255);
    }
}
