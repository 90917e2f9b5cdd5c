use proptest::prelude::*;

use veritas_core::config::RunConfig;
use veritas_core::message::{Message, UsageMetadata};
use veritas_core::model::ModelPricing;

proptest! {
    /// Message serde roundtrip preserves content for every variant.
    #[test]
    fn message_roundtrip(content in "[ -~]{0,200}") {
        for msg in [
            Message::system(content.clone()),
            Message::user(content.clone()),
            Message::ai(content.clone()),
        ] {
            let json = serde_json::to_string(&msg).unwrap();
            let parsed: Message = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(&msg, &parsed);
            prop_assert_eq!(parsed.content(), content.as_str());
        }
    }

    /// Cost is non-negative for non-negative rates and scales linearly
    /// with token counts.
    #[test]
    fn cost_non_negative(
        input_rate in 0.0f64..10.0,
        output_rate in 0.0f64..10.0,
        input_tokens in 0u64..1_000_000,
        output_tokens in 0u64..1_000_000,
    ) {
        let pricing = ModelPricing::new(input_rate, output_rate);
        let usage = UsageMetadata {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        };
        let cost = pricing.cost(&usage);
        prop_assert!(cost >= 0.0, "cost {} went negative", cost);

        let doubled = UsageMetadata {
            input_tokens: input_tokens * 2,
            output_tokens: output_tokens * 2,
            total_tokens: (input_tokens + output_tokens) * 2,
        };
        prop_assert!((pricing.cost(&doubled) - 2.0 * cost).abs() < 1e-6);
    }

    /// RunConfig serde roundtrip preserves tags, metadata, and run id.
    #[test]
    fn run_config_roundtrip(
        tags in prop::collection::vec("[a-z]{1,12}", 0..5),
        meta_key in "[a-z]{1,12}",
        meta_val in any::<i64>(),
    ) {
        let mut config = RunConfig::new()
            .with_metadata(meta_key.clone(), serde_json::json!(meta_val));
        for tag in &tags {
            config = config.with_tag(tag.clone());
        }

        let json = serde_json::to_string(&config).unwrap();
        let parsed: RunConfig = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(&parsed.tags, &tags);
        prop_assert_eq!(&parsed.metadata[&meta_key], &serde_json::json!(meta_val));
        prop_assert_eq!(parsed.run_id, config.run_id);
    }
}
