//! Batch runner: many independent matches, optionally spread over rayon.

use super::batch::{simulate_match, MatchSummary, TeamBuffers};
use super::config::BatchConfig;
use super::pool::WorkerPool;
use super::report::BatchReport;
use crate::character::roster::UnitSnapshot;
use crate::combat::types::Side;
use crate::core::config::CombatTuning;
use crate::core::error::CombatError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::info;

/// Runs `config.rounds` matches between two rosters and aggregates them.
pub fn run_batch(
    team_a: &[UnitSnapshot],
    team_b: &[UnitSnapshot],
    tuning: &CombatTuning,
    config: &BatchConfig,
) -> Result<BatchReport, CombatError> {
    let a = TeamBuffers::from_snapshots(team_a);
    let b = TeamBuffers::from_snapshots(team_b);
    run_batch_buffers(&a, &b, tuning, config)
}

/// Same as [`run_batch`] over prebuilt buffers.
///
/// Match `i` is seeded with `seed + i`, so sequential and parallel runs
/// produce the same report.
pub fn run_batch_buffers(
    team_a: &TeamBuffers,
    team_b: &TeamBuffers,
    tuning: &CombatTuning,
    config: &BatchConfig,
) -> Result<BatchReport, CombatError> {
    if !team_a.has_living() {
        return Err(CombatError::EmptySide(Side::Allies));
    }
    if !team_b.has_living() {
        return Err(CombatError::EmptySide(Side::Enemies));
    }
    if config.rounds == 0 {
        return Err(CombatError::InvalidRounds);
    }
    tuning.validate()?;

    let play = |round: u32| -> MatchSummary {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(round as u64));
        simulate_match(team_a, team_b, tuning, config.max_ticks_per_match, &mut rng)
    };

    let matches: Vec<MatchSummary> = if config.parallel {
        WorkerPool::with_workers(config.workers)
            .install(|| (0..config.rounds).into_par_iter().map(play).collect::<Vec<_>>())?
    } else {
        (0..config.rounds).map(play).collect()
    };

    let report = BatchReport::from_matches(&matches);
    info!(
        rounds = report.rounds,
        wins_a = report.wins_a,
        wins_b = report.wins_b,
        timeouts = report.timeouts,
        parallel = config.parallel,
        "batch complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::PrimaryStats;
    use crate::character::job::Job;

    fn team(id: u32, strength: u32) -> Vec<UnitSnapshot> {
        vec![UnitSnapshot::new(
            id,
            "fighter",
            Job::Warrior,
            5,
            PrimaryStats::new(strength, 5, 5, 1, 1),
        )]
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let result = run_batch(
            &team(1, 5),
            &team(2, 5),
            &CombatTuning::default(),
            &BatchConfig::sequential(0, 1),
        );
        assert_eq!(result, Err(CombatError::InvalidRounds));
    }

    #[test]
    fn test_empty_team_rejected() {
        let result = run_batch(
            &[],
            &team(2, 5),
            &CombatTuning::default(),
            &BatchConfig::sequential(10, 1),
        );
        assert_eq!(result, Err(CombatError::EmptySide(Side::Allies)));
    }

    #[test]
    fn test_wins_sum_to_rounds() {
        let report = run_batch(
            &team(1, 6),
            &team(2, 5),
            &CombatTuning::default(),
            &BatchConfig::sequential(200, 42),
        )
        .unwrap();
        assert_eq!(report.wins_a + report.wins_b, 200);
    }
}
