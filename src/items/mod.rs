//! Equipment snapshots read from the roster.

pub mod equipment;
pub mod types;

pub use equipment::*;
pub use types::*;
