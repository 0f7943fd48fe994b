//! Quality and ATS reviewers plus score extraction.

pub mod evaluator;
pub mod prompts;
pub mod score;

pub use evaluator::LlmEvaluator;
pub use score::ScoreExtractor;
