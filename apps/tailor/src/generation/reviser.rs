//! LLM-backed `Reviser`: rewrites the current document against feedback,
//! which is either a rendered `ValidationReport` or a quality report.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::prompts::REVISION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{
    section, EMPHASIS_INSTRUCTION, FACTUAL_INSTRUCTION, YAML_ONLY_SYSTEM,
};
use crate::llm_client::LlmClient;
use crate::models::ResumeDocument;
use crate::pipeline::collaborators::{JobContext, Reviser};

pub struct LlmReviser {
    llm: LlmClient,
}

impl LlmReviser {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Reviser for LlmReviser {
    async fn revise(
        &self,
        current: &ResumeDocument,
        feedback: &str,
        job: &JobContext,
    ) -> Result<ResumeDocument, AppError> {
        let current_yaml = current.to_yaml()?;
        let constraints = job.schema.to_yaml()?;
        let prompt = build_revision_prompt(&current_yaml, feedback, job, &constraints);

        info!("Requesting revision ({} chars of feedback)", feedback.len());
        debug!("Revision feedback:\n{feedback}");

        let text = self.llm.call_text(&prompt, YAML_ONLY_SYSTEM).await?;
        let mut revised = ResumeDocument::from_yaml(&text)?;

        // The model is not asked to carry bookkeeping fields.
        if revised.company_name.is_none() {
            revised.company_name = current.company_name.clone();
        }
        Ok(revised)
    }
}

pub fn build_revision_prompt(
    current_yaml: &str,
    feedback: &str,
    job: &JobContext,
    constraints_yaml: &str,
) -> String {
    let profile_section = if job.reference_facts.trim().is_empty() {
        String::new()
    } else {
        section("CANDIDATE PROFILE (source of truth):", &job.reference_facts)
    };

    REVISION_PROMPT_TEMPLATE
        .replace(
            "{document_section}",
            &section("CURRENT DOCUMENT:", current_yaml),
        )
        .replace("{feedback_section}", &section("FEEDBACK TO ADDRESS:", feedback))
        .replace("{jd_section}", &section("JOB DESCRIPTION:", &job.job_description))
        .replace(
            "{constraints_section}",
            &section("CONSTRAINTS (MUST FOLLOW):", constraints_yaml),
        )
        .replace("{profile_section}", &profile_section)
        .replace("{factual_instruction}", FACTUAL_INSTRUCTION)
        .replace("{emphasis_instruction}", EMPHASIS_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintSchema;

    #[test]
    fn test_revision_prompt_embeds_feedback_and_document() {
        let job = JobContext {
            job_description: "Platform engineer, Go and Kubernetes".to_string(),
            reference_facts: String::new(),
            schema: ConstraintSchema::default(),
            company: None,
        };
        let feedback = "1. summary length: 530 (need 450-520) -> remove 10 characters";
        let prompt = build_revision_prompt("summary: \"x\"\n", feedback, &job, "skills: {}");

        assert!(prompt.contains("CURRENT DOCUMENT:\n"));
        assert!(prompt.contains("summary: \"x\""));
        assert!(prompt.contains("remove 10 characters"));
        assert!(prompt.contains("Platform engineer"));
        assert!(!prompt.contains("CANDIDATE PROFILE"));
        assert!(!prompt.contains("{feedback_section}"));
    }
}
