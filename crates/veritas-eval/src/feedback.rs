use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use veritas_core::error::{FeedbackError, Result};
use veritas_core::message::{Message, UsageMetadata};
use veritas_core::model::{CallOptions, ChatModel, ModelPricing};

use crate::prompts;

/// Score from a single feedback function invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackScore {
    /// Score value in [0, 1].
    pub value: f64,
    /// Name of the metric.
    pub metric: String,
    /// Optional explanation (chain-of-thought reasoning, if any).
    #[serde(default)]
    pub explanation: Option<String>,
    /// Token usage of the underlying model call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageMetadata>,
    /// Dollar cost attributed to this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// A feedback function: scores a `(query, response)` pair.
#[async_trait]
pub trait FeedbackFunction: Send + Sync {
    /// Name of this feedback function.
    fn name(&self) -> &str;
    /// Compute the feedback score for the pair.
    async fn score(&self, query: &str, response: &str) -> Result<FeedbackScore>;
}

/// How the grading prompt is phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Bare rating request.
    Base,
    /// Reason first, then a final `Score:` line.
    ChainOfThought,
}

/// Which relevance dimension is being judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceDimension {
    /// Relevance of a response to the prompt that produced it.
    AnswerRelevance,
    /// Relevance of a retrieved statement to a question.
    ContextRelevance,
}

/// LLM-backed relevance feedback over a `(prompt, response)` pair.
///
/// The model is asked for a 1-10 rating which is mapped to [0, 1].
pub struct RelevanceFeedback {
    model: Arc<dyn ChatModel>,
    style: PromptStyle,
    dimension: RelevanceDimension,
    metric_name: String,
    pricing: Option<ModelPricing>,
}

impl RelevanceFeedback {
    pub fn new(model: Arc<dyn ChatModel>, style: PromptStyle) -> Self {
        Self {
            model,
            style,
            dimension: RelevanceDimension::AnswerRelevance,
            metric_name: "relevance".into(),
            pricing: None,
        }
    }

    pub fn with_dimension(mut self, dimension: RelevanceDimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_metric_name(mut self, name: impl Into<String>) -> Self {
        self.metric_name = name.into();
        self
    }

    pub fn with_pricing(mut self, pricing: ModelPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    fn template(&self) -> &'static str {
        match (self.dimension, self.style) {
            (RelevanceDimension::AnswerRelevance, PromptStyle::Base) => prompts::PR_RELEVANCE,
            (RelevanceDimension::AnswerRelevance, PromptStyle::ChainOfThought) => {
                prompts::PR_RELEVANCE_COT
            }
            (RelevanceDimension::ContextRelevance, PromptStyle::Base) => prompts::QS_RELEVANCE,
            (RelevanceDimension::ContextRelevance, PromptStyle::ChainOfThought) => {
                prompts::QS_RELEVANCE_COT
            }
        }
    }
}

#[async_trait]
impl FeedbackFunction for RelevanceFeedback {
    fn name(&self) -> &str {
        &self.metric_name
    }

    async fn score(&self, query: &str, response: &str) -> Result<FeedbackScore> {
        let prompt = prompts::render(self.template(), query, response);
        let messages = vec![Message::system(prompt)];
        let options = CallOptions {
            temperature: Some(0.0),
            ..Default::default()
        };

        let result = self.model.generate(&messages, &options).await?;
        let text = result.message.content().trim().to_string();
        if text.is_empty() {
            return Err(FeedbackError::MissingResponse.into());
        }

        let rating = parse_rating(&text)?;
        let value = (rating as f64 / 10.0).clamp(0.0, 1.0);

        let cost = match (&self.pricing, &result.usage) {
            (Some(pricing), Some(usage)) => Some(pricing.cost(usage)),
            _ => None,
        };

        Ok(FeedbackScore {
            value,
            metric: self.metric_name.clone(),
            explanation: match self.style {
                PromptStyle::ChainOfThought => Some(text),
                PromptStyle::Base => None,
            },
            usage: result.usage,
            cost,
        })
    }
}

static RATING_FULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([1-9][0-9]*)\s*$").unwrap());
static RATING_SCORE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)score\s*:\s*([1-9][0-9]*)").unwrap());
static RATING_SOFT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[1-9][0-9]*").unwrap());

/// Extract a 1-10 rating from model output.
///
/// Tries, in order: the whole reply as a bare number, a `Score: <n>` line,
/// and finally the first integer anywhere in the text. An unparseable reply
/// is an error rather than a sentinel, so it cannot leak into aggregates.
pub fn parse_rating(text: &str) -> Result<u32> {
    let captured = RATING_FULL
        .captures(text)
        .or_else(|| RATING_SCORE_LINE.captures(text))
        .map(|c| c.get(1).map_or("", |m| m.as_str()).to_string())
        .or_else(|| RATING_SOFT.find(text).map(|m| m.as_str().to_string()));

    match captured.and_then(|s| s.parse::<u32>().ok()) {
        Some(n) => Ok(n.min(10)),
        None => Err(FeedbackError::UnparseableRating(text.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::error::VeritasError;
    use veritas_core::message::AIContent;
    use veritas_core::model::ChatResult;

    // --- parse_rating tests ---

    #[test]
    fn parse_bare_number() {
        assert_eq!(parse_rating("8").unwrap(), 8);
        assert_eq!(parse_rating("  10  ").unwrap(), 10);
    }

    #[test]
    fn parse_score_line() {
        let text = "The response addresses the question directly.\nScore: 9";
        assert_eq!(parse_rating(text).unwrap(), 9);
    }

    #[test]
    fn parse_score_line_case_insensitive() {
        assert_eq!(parse_rating("score: 3").unwrap(), 3);
        assert_eq!(parse_rating("SCORE : 7").unwrap(), 7);
    }

    #[test]
    fn parse_soft_match() {
        assert_eq!(parse_rating("I would rate this a 6 out of 10").unwrap(), 6);
    }

    #[test]
    fn parse_clamps_above_ten() {
        assert_eq!(parse_rating("15").unwrap(), 10);
    }

    #[test]
    fn parse_rejects_unrateable_text() {
        let err = parse_rating("I cannot rate this").unwrap_err();
        assert!(matches!(
            err,
            VeritasError::Feedback(FeedbackError::UnparseableRating(_))
        ));
    }

    #[test]
    fn parse_score_line_preferred_over_soft_match() {
        // Reasoning text mentions other numbers; the Score line wins.
        let text = "Reason 1: mentions 3 facts.\nReason 2: off-topic.\nScore: 2";
        assert_eq!(parse_rating(text).unwrap(), 2);
    }

    // --- RelevanceFeedback tests ---

    struct MockChatModel {
        response: String,
        with_usage: bool,
    }

    #[async_trait]
    impl ChatModel for MockChatModel {
        async fn generate(
            &self,
            _messages: &[Message],
            _options: &CallOptions,
        ) -> Result<ChatResult> {
            let usage = self.with_usage.then(|| UsageMetadata {
                input_tokens: 100,
                output_tokens: 10,
                total_tokens: 110,
            });
            Ok(ChatResult {
                message: Message::AI(AIContent {
                    content: self.response.clone(),
                    usage: usage.clone(),
                }),
                usage,
            })
        }

        fn model_name(&self) -> &str {
            "mock-grader"
        }
    }

    fn mock(response: &str) -> Arc<dyn ChatModel> {
        Arc::new(MockChatModel {
            response: response.into(),
            with_usage: true,
        })
    }

    #[tokio::test]
    async fn base_style_scores_bare_rating() {
        let feedback = RelevanceFeedback::new(mock("9"), PromptStyle::Base);
        let score = feedback
            .score("What is the capital of France?", "Paris.")
            .await
            .unwrap();
        assert!((score.value - 0.9).abs() < 1e-10);
        assert_eq!(score.metric, "relevance");
        assert!(score.explanation.is_none());
    }

    #[tokio::test]
    async fn cot_style_keeps_reasoning_as_explanation() {
        let feedback = RelevanceFeedback::new(
            mock("The response names the correct city.\nScore: 10"),
            PromptStyle::ChainOfThought,
        );
        let score = feedback.score("Capital of France?", "Paris.").await.unwrap();
        assert_eq!(score.value, 1.0);
        assert!(score.explanation.unwrap().contains("correct city"));
    }

    #[tokio::test]
    async fn pricing_yields_cost() {
        let feedback = RelevanceFeedback::new(mock("5"), PromptStyle::Base)
            .with_pricing(ModelPricing::new(1.0, 2.0));
        let score = feedback.score("q", "r").await.unwrap();
        // 100/1000 * 1.0 + 10/1000 * 2.0
        assert!((score.cost.unwrap() - 0.12).abs() < 1e-10);
        assert!(score.usage.is_some());
    }

    #[tokio::test]
    async fn no_pricing_no_cost() {
        let feedback = RelevanceFeedback::new(mock("5"), PromptStyle::Base);
        let score = feedback.score("q", "r").await.unwrap();
        assert!(score.cost.is_none());
    }

    #[tokio::test]
    async fn empty_reply_is_error() {
        let feedback = RelevanceFeedback::new(mock("   "), PromptStyle::Base);
        let err = feedback.score("q", "r").await.unwrap_err();
        assert!(matches!(
            err,
            VeritasError::Feedback(FeedbackError::MissingResponse)
        ));
    }

    #[tokio::test]
    async fn unparseable_reply_is_error() {
        let feedback = RelevanceFeedback::new(mock("no idea"), PromptStyle::Base);
        let err = feedback.score("q", "r").await.unwrap_err();
        assert!(matches!(
            err,
            VeritasError::Feedback(FeedbackError::UnparseableRating(_))
        ));
    }

    #[tokio::test]
    async fn custom_metric_name() {
        let feedback = RelevanceFeedback::new(mock("7"), PromptStyle::Base)
            .with_dimension(RelevanceDimension::ContextRelevance)
            .with_metric_name("context_relevance");
        assert_eq!(feedback.name(), "context_relevance");
        let score = feedback.score("q", "r").await.unwrap();
        assert_eq!(score.metric, "context_relevance");
    }

    #[test]
    fn template_selection_covers_all_combinations() {
        let model = mock("1");
        for (dimension, style, marker) in [
            (
                RelevanceDimension::AnswerRelevance,
                PromptStyle::Base,
                "RESPONSE to the given PROMPT",
            ),
            (
                RelevanceDimension::AnswerRelevance,
                PromptStyle::ChainOfThought,
                "Score: <number>",
            ),
            (
                RelevanceDimension::ContextRelevance,
                PromptStyle::Base,
                "STATEMENT to the given QUESTION",
            ),
            (
                RelevanceDimension::ContextRelevance,
                PromptStyle::ChainOfThought,
                "STATEMENT to the given QUESTION",
            ),
        ] {
            let feedback =
                RelevanceFeedback::new(model.clone(), style).with_dimension(dimension);
            assert!(
                feedback.template().contains(marker),
                "missing {marker:?} for {dimension:?}/{style:?}"
            );
        }
    }
}
