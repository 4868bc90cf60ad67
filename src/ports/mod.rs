//! Port traits defining external boundaries.
//!
//! The only boundary is process spawning. Implementations live in
//! `src/adapters/` and in [`crate::interceptor`].

pub mod runner;

pub use runner::{CommandOutput, CommandRunner, OutputMode};
