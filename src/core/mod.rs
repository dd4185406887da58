//! Engine configuration, errors and the interactive battle loop.

#![allow(unused_imports)]

pub mod battle_loop;
pub mod config;
pub mod constants;
pub mod error;

pub use battle_loop::*;
pub use config::*;
pub use constants::*;
pub use error::*;
