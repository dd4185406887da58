//! Character attributes, derived stats, jobs and the roster seam.

#![allow(unused_imports)]

pub mod attributes;
pub mod derived_stats;
pub mod job;
pub mod roster;

pub use attributes::*;
pub use derived_stats::*;
pub use job::*;
pub use roster::*;
