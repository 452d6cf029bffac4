//! Command-outcome reconciliation: classification, dependency recovery and
//! the archive install state machine. Nothing in here runs a command.

pub mod archive;
pub mod classifier;
pub mod dependencies;
pub mod types;
