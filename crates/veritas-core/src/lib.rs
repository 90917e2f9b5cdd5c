pub mod config;
pub mod error;
pub mod message;
pub mod model;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::RunConfig;
    pub use crate::error::{Result, VeritasError};
    pub use crate::message::{AIContent, Message, UsageMetadata};
    pub use crate::model::{CallOptions, ChatModel, ChatResult, ModelPricing};
}
