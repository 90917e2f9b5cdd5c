pub mod feedback;
pub mod golden;
pub mod leaderboard;
pub mod prompts;
pub mod runner;

pub mod prelude {
    pub use crate::feedback::{
        FeedbackFunction, FeedbackScore, PromptStyle, RelevanceDimension, RelevanceFeedback,
    };
    pub use crate::golden::{GoldenRecord, GoldenSet};
    pub use crate::leaderboard::{Leaderboard, LeaderboardEntry};
    pub use crate::runner::{EvalReport, EvalRunner, SampleResult, ScoringConfig};
}
