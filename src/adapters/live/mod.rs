//! Live adapters that spawn real processes.

pub mod runner;
