use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
///
/// Variants follow the pipeline's failure taxonomy: some are fatal wherever they
/// occur (`Generation`, `Render`), the rest are counted against whichever retry
/// budget is active when the controller sees them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Malformed resume document: {0}")]
    MalformedDocument(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Collaborator call failed: {0}")]
    Collaborator(String),

    #[error("{stage} timed out after {}s", .after.as_secs())]
    Timeout { stage: &'static str, after: Duration },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::MalformedDocument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_includes_stage_and_seconds() {
        let err = AppError::Timeout {
            stage: "revise",
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "revise timed out after 30s");
    }

    #[test]
    fn test_yaml_error_maps_to_malformed_document() {
        let err: AppError = serde_yaml::from_str::<Vec<String>>("summary: [")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::MalformedDocument(_)));
    }
}
