//! Configuration and dependency wiring.

mod dependencies;

pub use dependencies::{Dependencies, IdPolicyKind, Settings};
