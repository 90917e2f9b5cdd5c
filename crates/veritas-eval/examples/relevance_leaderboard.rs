//! Score four relevance-grading configurations (two models, two prompting
//! styles) against a small hand-labeled golden set and print the leaderboard.
//!
//! Requires OPENAI_API_KEY.

use std::sync::Arc;

use veritas_core::config::RunConfig;
use veritas_core::error::{Result, VeritasError};
use veritas_core::model::{ChatModel, ModelPricing};
use veritas_eval::prelude::*;
use veritas_llm::OpenAIChatModel;

fn golden_set() -> Result<GoldenSet> {
    GoldenSet::from_records(
        "answer-relevance-golden",
        vec![
            GoldenRecord::new(
                "What is the capital of France?",
                "Paris is the capital of France.",
                0.9,
            ),
            GoldenRecord::new(
                "What is the capital of France?",
                "The capital of Japan is Tokyo.",
                0.1,
            ),
            GoldenRecord::new(
                "How do I parse JSON in Rust?",
                "Use serde_json::from_str to deserialize a JSON string.",
                0.9,
            ),
            GoldenRecord::new(
                "How do I parse JSON in Rust?",
                "Rust was first released in 2015.",
                0.2,
            ),
        ],
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| VeritasError::Other("OPENAI_API_KEY is not set".into()))?;

    let small: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(
        api_key.clone(),
        "gpt-4o-mini".into(),
    ));
    let large: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(api_key, "gpt-4o".into()));
    let small_pricing = ModelPricing::new(0.00015, 0.0006);
    let large_pricing = ModelPricing::new(0.0025, 0.01);

    let runner = EvalRunner::new()
        .add_config(ScoringConfig::new(
            "gpt-4o-mini/base",
            RelevanceFeedback::new(small.clone(), PromptStyle::Base)
                .with_pricing(small_pricing),
        ))
        .add_config(ScoringConfig::new(
            "gpt-4o-mini/cot",
            RelevanceFeedback::new(small, PromptStyle::ChainOfThought)
                .with_pricing(small_pricing),
        ))
        .add_config(ScoringConfig::new(
            "gpt-4o/base",
            RelevanceFeedback::new(large.clone(), PromptStyle::Base)
                .with_pricing(large_pricing),
        ))
        .add_config(ScoringConfig::new(
            "gpt-4o/cot",
            RelevanceFeedback::new(large, PromptStyle::ChainOfThought)
                .with_pricing(large_pricing),
        ));

    let golden = golden_set()?;
    let run_config = RunConfig::new().with_tag("relevance-bench");
    let report = runner.run(&golden, &run_config).await?;

    println!("{}", report.leaderboard());
    Ok(())
}
