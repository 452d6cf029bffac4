//! # Package operations
//!
//! - `apt` builds the package-manager command lines.
//! - `engine` runs batches of installs, removals and archive installs.
//! - `archives` finds and selects local `.deb` files.
//!
//! Outcome classification and the archive state machine live in
//! [`crate::core`]; this module only wires them to a command runner.

pub mod apt;
pub mod archives;
pub mod engine;

pub use engine::{DependencyPolicy, PackageEngine};
