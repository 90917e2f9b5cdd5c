use std::fmt;

use serde::{Deserialize, Serialize};

use crate::runner::EvalReport;

/// Mean over exactly the values yielded, 0.0 for an empty iterator. Each
/// statistic counts its own denominator, so a sample that carries no value
/// for one column never dilutes that column's mean.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

/// One row of the leaderboard: aggregate statistics for a scoring config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub config_name: String,
    pub samples: usize,
    pub failures: usize,
    /// Mean feedback score over successful samples.
    pub mean_score: f64,
    /// Mean absolute difference from the golden expected scores.
    pub mean_golden_difference: f64,
    pub mean_latency_ms: f64,
    pub total_cost: f64,
}

/// Aggregate report of an evaluation run, one entry per config, ordered
/// best-first by mean golden difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn from_report(report: &EvalReport) -> Self {
        let mut entries: Vec<LeaderboardEntry> = report
            .configs
            .iter()
            .map(|config| {
                let succeeded: Vec<_> =
                    config.samples.iter().filter(|s| s.succeeded()).collect();

                LeaderboardEntry {
                    config_name: config.config_name.clone(),
                    samples: config.samples.len(),
                    failures: config.samples.len() - succeeded.len(),
                    mean_score: mean(succeeded.iter().filter_map(|s| s.actual_score)),
                    mean_golden_difference: mean(
                        succeeded.iter().filter_map(|s| s.golden_difference),
                    ),
                    mean_latency_ms: mean(succeeded.iter().map(|s| s.latency_ms as f64)),
                    total_cost: config.samples.iter().filter_map(|s| s.cost).sum(),
                }
            })
            .collect();

        // Best agreement with the golden set first; configs that produced
        // no successful samples sink to the bottom.
        entries.sort_by(|a, b| {
            let a_dead = a.samples == a.failures;
            let b_dead = b.samples == b.failures;
            a_dead.cmp(&b_dead).then(
                a.mean_golden_difference
                    .partial_cmp(&b.mean_golden_difference)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<32} {:>10} {:>10} {:>12} {:>10} {:>8} {:>8}",
            "config", "mean_score", "mean_diff", "latency_ms", "cost_usd", "samples", "failed"
        )?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<32} {:>10.3} {:>10.3} {:>12.1} {:>10.4} {:>8} {:>8}",
                entry.config_name,
                entry.mean_score,
                entry.mean_golden_difference,
                entry.mean_latency_ms,
                entry.total_cost,
                entry.samples,
                entry.failures,
            )?;
        }
        Ok(())
    }
}
