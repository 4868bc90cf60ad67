//! `shell-mock check` command.

use std::path::Path;

use crate::cassette::format::Cassette;
use crate::cassette::replayer;
use crate::registry::StubRegistry;
use crate::stub::CommandStub;

/// Execute the `check` command: load the cassette and list the stubs it
/// would install.
///
/// # Errors
///
/// Returns an error string if the cassette cannot be read or parsed.
pub fn run(path: &Path) -> Result<u8, String> {
    let cassette = Cassette::load(path).map_err(|e| e.to_string())?;
    let registry = StubRegistry::new();
    let stubs = replayer::install(&cassette, &registry);

    println!("{} ({} stubs)", cassette.name, stubs.len());
    for line in stubs.iter().map(describe) {
        println!("  {line}");
    }
    Ok(0)
}

/// One-line summary of a stub.
fn describe(stub: &CommandStub) -> String {
    let constraints = stub.constraints();
    let mut line = format!("{} -> exit {}", stub.pattern(), stub.exit_code());
    for (key, value) in &constraints.env {
        line.push_str(&format!(" [{key}={value}]"));
    }
    for (key, value) in &constraints.options {
        line.push_str(&format!(" [{key}: {value}]"));
    }
    line
}
