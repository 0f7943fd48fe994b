//! LLM-backed reviewers for rendered artifacts.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::evaluation::prompts::{
    ATS_PROMPT_TEMPLATE, ATS_SYSTEM, QUALITY_PROMPT_TEMPLATE, QUALITY_SYSTEM,
};
use crate::llm_client::prompts::section;
use crate::llm_client::LlmClient;
use crate::pipeline::collaborators::{Artifact, Evaluator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationKind {
    Quality,
    Ats,
}

impl EvaluationKind {
    fn template(self) -> &'static str {
        match self {
            EvaluationKind::Quality => QUALITY_PROMPT_TEMPLATE,
            EvaluationKind::Ats => ATS_PROMPT_TEMPLATE,
        }
    }

    fn system(self) -> &'static str {
        match self {
            EvaluationKind::Quality => QUALITY_SYSTEM,
            EvaluationKind::Ats => ATS_SYSTEM,
        }
    }
}

pub struct LlmEvaluator {
    kind: EvaluationKind,
    llm: LlmClient,
    reference_facts: String,
}

impl LlmEvaluator {
    pub fn quality(llm: LlmClient, reference_facts: String) -> Self {
        Self {
            kind: EvaluationKind::Quality,
            llm,
            reference_facts,
        }
    }

    pub fn ats(llm: LlmClient, reference_facts: String) -> Self {
        Self {
            kind: EvaluationKind::Ats,
            llm,
            reference_facts,
        }
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn evaluate(&self, artifact: &Artifact, job_description: &str) -> Result<String, AppError> {
        let resume_text = artifact_text(artifact).await?;
        let prompt = build_prompt(self.kind, job_description, &self.reference_facts, &resume_text);

        info!("Running {:?} review ({} chars of resume text)", self.kind, resume_text.len());
        let report = self.llm.call_text(&prompt, self.kind.system()).await?;
        debug!("{:?} report:\n{report}", self.kind);
        Ok(report)
    }
}

pub fn build_prompt(
    kind: EvaluationKind,
    job_description: &str,
    reference_facts: &str,
    resume_text: &str,
) -> String {
    let jd = if job_description.trim().is_empty() {
        "General software engineering position"
    } else {
        job_description
    };
    let profile = if reference_facts.trim().is_empty() {
        "Profile not available"
    } else {
        reference_facts
    };

    kind.template()
        .replace("{jd_section}", &section("JOB DESCRIPTION:", jd))
        .replace("{profile_section}", &section("CANDIDATE PROFILE:", profile))
        .replace("{resume_section}", &section("RESUME:", resume_text))
}

/// Text the reviewer sees: extracted from the PDF when one was compiled,
/// otherwise the LaTeX source.
pub async fn artifact_text(artifact: &Artifact) -> Result<String, AppError> {
    match &artifact.pdf_path {
        Some(pdf) => extract_pdf_text(pdf).await,
        None => Ok(tokio::fs::read_to_string(&artifact.source_path).await?),
    }
}

async fn extract_pdf_text(path: &Path) -> Result<String, AppError> {
    let owned = path.to_path_buf();
    // pdf-extract can panic on malformed input; a panicked task is an
    // extraction failure like any other.
    let result = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&owned).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())
    .and_then(|inner| inner);

    result.map_err(|e| {
        AppError::Collaborator(format!("cannot read text from {}: {e}", path.display()))
    })
}
