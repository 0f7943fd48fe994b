//! Resume Generation: the LLM-backed `ContentGenerator`.
//!
//! Flow: serialize constraints → build prompt (JD, constraints, profile) →
//!       LLM call → parse YAML into a `ResumeDocument`.
//!
//! Parsing failures are not retried here; the controller treats any error
//! from this stage as fatal.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{
    COMPANY_PROMPT_TEMPLATE, COMPANY_SYSTEM, GENERATION_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{
    section, EMPHASIS_INSTRUCTION, FACTUAL_INSTRUCTION, YAML_ONLY_SYSTEM,
};
use crate::llm_client::LlmClient;
use crate::models::ResumeDocument;
use crate::pipeline::collaborators::{ContentGenerator, JobContext};

/// Only the head of a posting is sent for company detection.
const COMPANY_EXCERPT_CHARS: usize = 1000;
/// Longer answers are treated as the model rambling, not a name.
const MAX_COMPANY_NAME_CHARS: usize = 50;
const LEGAL_SUFFIXES: [&str; 6] = [" Inc", " LLC", " Corporation", " Corp", " Ltd", " Limited"];

pub struct LlmContentGenerator {
    llm: LlmClient,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, job: &JobContext) -> Result<ResumeDocument, AppError> {
        let constraints = job.schema.to_yaml()?;
        let prompt = build_generation_prompt(job, &constraints);

        info!(
            "Generating resume document (jd: {} chars, profile: {} chars)",
            job.job_description.len(),
            job.reference_facts.len()
        );

        let text = self.llm.call_text(&prompt, YAML_ONLY_SYSTEM).await?;
        let mut document = ResumeDocument::from_yaml(&text)
            .map_err(|e| AppError::Generation(format!("model returned unusable YAML: {e}")))?;
        if job.company.is_some() {
            document.company_name = job.company.clone();
        }

        info!("Generation produced a parseable document");
        Ok(document)
    }
}

/// Fills the generation template. The profile section is omitted when no
/// reference facts were loaded.
pub fn build_generation_prompt(job: &JobContext, constraints_yaml: &str) -> String {
    let profile_section = if job.reference_facts.trim().is_empty() {
        String::new()
    } else {
        section("CANDIDATE PROFILE (source of truth):", &job.reference_facts)
    };

    GENERATION_PROMPT_TEMPLATE
        .replace("{jd_section}", &section("JOB DESCRIPTION:", &job.job_description))
        .replace(
            "{constraints_section}",
            &section("CONSTRAINTS (MUST FOLLOW EXACTLY):", constraints_yaml),
        )
        .replace("{profile_section}", &profile_section)
        .replace("{factual_instruction}", FACTUAL_INSTRUCTION)
        .replace("{emphasis_instruction}", EMPHASIS_INSTRUCTION)
}

// ────────────────────────────────────────────────────────────────────────────
// Company detection
// ────────────────────────────────────────────────────────────────────────────

/// Asks the model for the hiring company's name.
///
/// Never fails: any error or implausible answer yields `None`.
pub async fn detect_company(job_description: &str, llm: &LlmClient) -> Option<String> {
    let excerpt: String = job_description.chars().take(COMPANY_EXCERPT_CHARS).collect();
    let prompt = COMPANY_PROMPT_TEMPLATE.replace("{jd_excerpt}", &excerpt);

    match llm.call_text(&prompt, COMPANY_SYSTEM).await {
        Ok(raw) => {
            let name = clean_company_name(&raw);
            match &name {
                Some(n) => info!("Detected company: {n}"),
                None => warn!("Company detection returned an unusable answer: {raw:?}"),
            }
            name
        }
        Err(e) => {
            warn!("Company detection failed: {e}");
            None
        }
    }
}

/// Trims quotes and legal suffixes; rejects empty or overlong names.
pub fn clean_company_name(raw: &str) -> Option<String> {
    let mut name = raw.trim().trim_matches(['"', '\'']).trim();
    for suffix in LEGAL_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.trim_end_matches(',').trim();
        }
    }
    if name.is_empty() || name.chars().count() >= MAX_COMPANY_NAME_CHARS {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintSchema;

    fn job(profile: &str) -> JobContext {
        JobContext {
            job_description: "Backend Engineer at Stripe. Rust, Kafka.".to_string(),
            reference_facts: profile.to_string(),
            schema: ConstraintSchema::default(),
            company: None,
        }
    }

    #[test]
    fn test_generation_prompt_carries_all_inputs() {
        let job = job("Ada Lovelace. Built ledgers at LSEG.");
        let constraints = job.schema.to_yaml().unwrap();
        let prompt = build_generation_prompt(&job, &constraints);

        assert!(prompt.contains("Backend Engineer at Stripe"));
        assert!(prompt.contains("exact_categories: 7"));
        assert!(prompt.contains("Built ledgers at LSEG"));
        assert!(prompt.contains(FACTUAL_INSTRUCTION));
        assert!(!prompt.contains("{jd_section}"));
        assert!(!prompt.contains("{emphasis_instruction}"));
    }

    #[test]
    fn test_generation_prompt_without_profile_omits_section() {
        let job = job("  ");
        let prompt = build_generation_prompt(&job, "summary: {}");
        assert!(!prompt.contains("CANDIDATE PROFILE"));
    }

    #[test]
    fn test_clean_company_strips_quotes_and_suffixes() {
        assert_eq!(clean_company_name("\"Stripe Inc\"\n"), Some("Stripe".to_string()));
        assert_eq!(clean_company_name("Acme, LLC"), Some("Acme".to_string()));
        assert_eq!(clean_company_name("'ServiceNow'"), Some("ServiceNow".to_string()));
        assert_eq!(
            clean_company_name("Tata Consultancy Services Limited"),
            Some("Tata Consultancy Services".to_string())
        );
    }

    #[test]
    fn test_clean_company_rejects_empty_and_overlong() {
        assert_eq!(clean_company_name("  \"\" "), None);
        let long = "A".repeat(MAX_COMPANY_NAME_CHARS);
        assert_eq!(clean_company_name(&long), None);
    }
}
