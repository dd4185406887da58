//! Batch report generation.

use super::batch::{MatchSummary, MatchWinner};
use crate::combat::types::MatchStatistics;
use serde::Serialize;

/// Aggregated results from a batch of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub rounds: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    /// Matches decided on remaining HP at the tick cap
    pub timeouts: u32,

    // Per-match averages
    pub avg_attacks_a: f64,
    pub avg_attacks_b: f64,
    pub avg_crits_a: f64,
    pub avg_crits_b: f64,
    pub avg_evasions_a: f64,
    pub avg_evasions_b: f64,
    pub avg_damage_a: f64,
    pub avg_damage_b: f64,
    pub avg_ticks: f64,

    // Extremes across the whole batch
    pub max_hit_a: u32,
    pub max_hit_b: u32,

    /// Side totals across every match
    pub totals_a: MatchStatistics,
    pub totals_b: MatchStatistics,
}

impl BatchReport {
    pub fn from_matches(matches: &[MatchSummary]) -> Self {
        let rounds = matches.len() as u32;
        let n = rounds.max(1) as f64;
        let wins_a = matches
            .iter()
            .filter(|m| m.winner == MatchWinner::A)
            .count() as u32;
        let timeouts = matches.iter().filter(|m| m.timed_out).count() as u32;

        let mut totals_a = MatchStatistics::default();
        let mut totals_b = MatchStatistics::default();
        for m in matches {
            totals_a.merge(&m.stats_a);
            totals_b.merge(&m.stats_b);
        }
        let avg_ticks = matches.iter().map(|m| m.ticks as f64).sum::<f64>() / n;

        Self {
            rounds,
            wins_a,
            wins_b: rounds - wins_a,
            timeouts,
            avg_attacks_a: totals_a.attacks as f64 / n,
            avg_attacks_b: totals_b.attacks as f64 / n,
            avg_crits_a: totals_a.crits as f64 / n,
            avg_crits_b: totals_b.crits as f64 / n,
            avg_evasions_a: totals_a.evasions as f64 / n,
            avg_evasions_b: totals_b.evasions as f64 / n,
            avg_damage_a: totals_a.total_damage as f64 / n,
            avg_damage_b: totals_b.total_damage as f64 / n,
            avg_ticks,
            max_hit_a: totals_a.max_hit,
            max_hit_b: totals_b.max_hit,
            totals_a,
            totals_b,
        }
    }

    pub fn win_rate_a(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins_a as f64 / self.rounds as f64
        }
    }

    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                     BATCH BATTLE REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Matches: {} total, {} decided at the tick cap\n\n",
            self.rounds, self.timeouts
        ));

        report.push_str("── OUTCOME ──────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Team A wins:         {} ({:.1}%)\n",
            self.wins_a,
            self.win_rate_a() * 100.0
        ));
        report.push_str(&format!(
            "  Team B wins:         {} ({:.1}%)\n",
            self.wins_b,
            (1.0 - self.win_rate_a()) * 100.0
        ));
        report.push_str(&format!("  Avg Ticks:           {:.0}\n\n", self.avg_ticks));

        report.push_str("── PER MATCH ─────────────────────────────── Team A ──── Team B ─\n");
        report.push_str(&format!(
            "  Attacks:                            {:>8.1}  {:>8.1}\n",
            self.avg_attacks_a, self.avg_attacks_b
        ));
        report.push_str(&format!(
            "  Crits:                              {:>8.1}  {:>8.1}\n",
            self.avg_crits_a, self.avg_crits_b
        ));
        report.push_str(&format!(
            "  Evasions:                           {:>8.1}  {:>8.1}\n",
            self.avg_evasions_a, self.avg_evasions_b
        ));
        report.push_str(&format!(
            "  Damage:                             {:>8.0}  {:>8.0}\n",
            self.avg_damage_a, self.avg_damage_b
        ));
        report.push_str(&format!(
            "  Max Hit:                            {:>8}  {:>8}\n",
            self.max_hit_a, self.max_hit_b
        ));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(winner: MatchWinner, ticks: u64, hit: u32) -> MatchSummary {
        let mut stats_a = MatchStatistics::default();
        stats_a.record_hit(hit, false);
        stats_a.record_miss();
        let mut stats_b = MatchStatistics::default();
        stats_b.record_evasion();
        MatchSummary {
            winner,
            ticks,
            timed_out: false,
            stats_a,
            stats_b,
        }
    }

    #[test]
    fn test_from_matches_averages() {
        let report = BatchReport::from_matches(&[
            summary(MatchWinner::A, 10, 20),
            summary(MatchWinner::B, 30, 40),
        ]);
        assert_eq!(report.rounds, 2);
        assert_eq!(report.wins_a + report.wins_b, 2);
        assert_eq!(report.avg_attacks_a, 2.0);
        assert_eq!(report.avg_evasions_b, 1.0);
        assert_eq!(report.avg_damage_a, 30.0);
        assert_eq!(report.max_hit_a, 40);
        assert_eq!(report.avg_ticks, 20.0);
        assert_eq!(report.win_rate_a(), 0.5);
    }

    #[test]
    fn test_to_text_mentions_both_teams() {
        let report = BatchReport::from_matches(&[summary(MatchWinner::A, 5, 9)]);
        let text = report.to_text();
        assert!(text.contains("Team A wins:         1 (100.0%)"));
        assert!(text.contains("Team B wins:         0"));
    }
}
