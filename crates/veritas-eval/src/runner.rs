use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veritas_core::config::RunConfig;
use veritas_core::error::Result;

use crate::feedback::FeedbackFunction;
use crate::golden::GoldenSet;
use crate::leaderboard::Leaderboard;

/// A named wiring of a feedback function, one leaderboard row per config.
///
/// The notebook scenario of "two models times two prompting styles" is four
/// of these.
pub struct ScoringConfig {
    name: String,
    feedback: Arc<dyn FeedbackFunction>,
}

impl ScoringConfig {
    pub fn new(name: impl Into<String>, feedback: impl FeedbackFunction + 'static) -> Self {
        Self {
            name: name.into(),
            feedback: Arc::new(feedback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of scoring one golden record under one config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResult {
    pub query: String,
    pub response: String,
    /// Feedback score, absent when the call failed.
    pub actual_score: Option<f64>,
    /// Absolute difference from the golden expected score.
    pub golden_difference: Option<f64>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Failure description, if the feedback call did not produce a score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SampleResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-config slice of an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigReport {
    pub config_name: String,
    pub samples: Vec<SampleResult>,
}

/// Full report of one evaluation run over a golden set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub golden_set_name: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_samples: usize,
    pub configs: Vec<ConfigReport>,
}

impl EvalReport {
    /// Aggregate this report into a leaderboard.
    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::from_report(self)
    }
}

/// Runs every registered scoring config over a golden set.
pub struct EvalRunner {
    configs: Vec<ScoringConfig>,
}

impl EvalRunner {
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
        }
    }

    pub fn add_config(mut self, config: ScoringConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Score every golden record under every config.
    ///
    /// Configs run concurrently; samples within a config run sequentially.
    /// A failed feedback call is recorded on its sample and excluded from
    /// aggregates, it does not abort the run.
    pub async fn run(&self, golden: &GoldenSet, run_config: &RunConfig) -> Result<EvalReport> {
        let started_at = Utc::now();
        tracing::info!(
            run_id = %run_config.run_id,
            golden_set = %golden.name,
            configs = self.configs.len(),
            "starting evaluation run"
        );

        let config_futures = self
            .configs
            .iter()
            .map(|config| Self::run_config(config, golden));
        let configs = futures::future::join_all(config_futures).await;

        let finished_at = Utc::now();
        Ok(EvalReport {
            golden_set_name: golden.name.clone(),
            run_id: run_config.run_id,
            started_at,
            finished_at,
            total_samples: golden.len() * self.configs.len(),
            configs,
        })
    }

    async fn run_config(config: &ScoringConfig, golden: &GoldenSet) -> ConfigReport {
        let mut samples = Vec::with_capacity(golden.len());

        for record in golden.iter() {
            let start = Instant::now();
            let outcome = config.feedback.score(&record.query, &record.response).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            let sample = match outcome {
                Ok(score) => {
                    match golden.score_difference(&record.query, &record.response, score.value) {
                        Ok(diff) => SampleResult {
                            query: record.query.clone(),
                            response: record.response.clone(),
                            actual_score: Some(score.value),
                            golden_difference: Some(diff),
                            latency_ms,
                            cost: score.cost,
                            error: None,
                        },
                        Err(e) => SampleResult {
                            query: record.query.clone(),
                            response: record.response.clone(),
                            actual_score: Some(score.value),
                            golden_difference: None,
                            latency_ms,
                            cost: score.cost,
                            error: Some(e.to_string()),
                        },
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        config = %config.name,
                        query = %record.query,
                        error = %e,
                        "feedback call failed"
                    );
                    SampleResult {
                        query: record.query.clone(),
                        response: record.response.clone(),
                        actual_score: None,
                        golden_difference: None,
                        latency_ms,
                        cost: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            samples.push(sample);
        }

        tracing::info!(
            config = %config.name,
            samples = samples.len(),
            failures = samples.iter().filter(|s| !s.succeeded()).count(),
            "config evaluated"
        );

        ConfigReport {
            config_name: config.name.clone(),
            samples,
        }
    }
}

impl Default for EvalRunner {
    fn default() -> Self {
        Self::new()
    }
}
