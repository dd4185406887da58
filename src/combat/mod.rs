//! Combat types, attack resolution, scheduling and action resolution.

#![allow(unused_imports)]

pub mod events;
pub mod resolution;
pub mod resolver;
pub mod scheduler;
pub mod skills;
pub mod types;

pub use events::*;
pub use resolution::*;
pub use resolver::*;
pub use scheduler::*;
pub use skills::*;
pub use types::*;
