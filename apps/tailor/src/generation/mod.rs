// Generation and revision collaborators.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod generator;
pub mod prompts;
pub mod reviser;

pub use generator::{detect_company, LlmContentGenerator};
pub use reviser::LlmReviser;
