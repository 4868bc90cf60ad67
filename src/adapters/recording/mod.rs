//! Recording adapters that capture command runs to cassettes.

pub mod runner;
