//! Headless batch simulator for win-rate and damage statistics.
//!
//! Replays the basic-attack rules over flat numeric buffers. Matches are
//! independent, so a batch may spread them over a rayon pool; a single
//! match is always played on one thread.

mod batch;
mod config;
mod pool;
mod report;
mod runner;

pub use batch::{simulate_match, BatchUnit, MatchSummary, MatchWinner, TeamBuffers};
pub use config::BatchConfig;
pub use pool::WorkerPool;
pub use report::BatchReport;
pub use runner::{run_batch, run_batch_buffers};
