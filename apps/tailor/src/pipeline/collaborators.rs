//! Collaborator seams of the pipeline.
//!
//! The controller only ever talks to these traits. Production implementations
//! live in `generation`, `render` and `evaluation`; tests use `pipeline::fakes`.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintSchema;
use crate::errors::AppError;
use crate::models::ResumeDocument;

/// Inputs that stay fixed for the whole run.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub job_description: String,
    /// Candidate profile: the source of truth for every generated fact.
    pub reference_facts: String,
    pub schema: ConstraintSchema,
    /// Hiring company, when known before generation.
    pub company: Option<String>,
}

/// Handle to a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// The filled template (`.tex`).
    pub source_path: PathBuf,
    /// Compiled output. `None` when compilation was not requested.
    pub pdf_path: Option<PathBuf>,
}

/// Produces the initial document from a job description.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, job: &JobContext) -> Result<ResumeDocument, AppError>;
}

/// Rewrites a document in response to feedback text.
///
/// Implementations must return a fully parsed document; unparseable model
/// output is reported as `AppError::MalformedDocument`.
#[async_trait]
pub trait Reviser: Send + Sync {
    async fn revise(
        &self,
        current: &ResumeDocument,
        feedback: &str,
        job: &JobContext,
    ) -> Result<ResumeDocument, AppError>;
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, document: &ResumeDocument) -> Result<Artifact, AppError>;
}

/// Reviews a rendered artifact against the job description and returns a
/// free-text report. The score is pulled out of the text by a `ScoreExtractor`.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, artifact: &Artifact, job_description: &str)
        -> Result<String, AppError>;
}
