//! Final report of one pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::collaborators::Artifact;
use crate::validation::ValidationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotRun,
    Passed,
    Failed,
    /// Disabled by a flag. Counts as a pass for the success rule.
    Skipped,
    /// Quality budget exhausted below threshold. Not a failure.
    AcceptedWithCaveat,
    /// Informational stage whose collaborator call failed.
    Errored,
}

impl StageStatus {
    pub fn label(self) -> &'static str {
        match self {
            StageStatus::NotRun => "not run",
            StageStatus::Passed => "passed",
            StageStatus::Failed => "FAILED",
            StageStatus::Skipped => "skipped",
            StageStatus::AcceptedWithCaveat => "accepted with caveat",
            StageStatus::Errored => "errored",
        }
    }

    fn counts_as_pass(self) -> bool {
        matches!(self, StageStatus::Passed | StageStatus::Skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    GenerationFailed,
    ValidationExhausted,
    RenderFailed,
    /// Stopped by an error outside any stage budget (e.g. persisting the document).
    Aborted,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Aborted => 1,
            Outcome::GenerationFailed => 2,
            Outcome::ValidationExhausted => 3,
            Outcome::RenderFailed => 4,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub company: Option<String>,

    pub generation: StageStatus,
    pub validation: StageStatus,
    pub render: StageStatus,
    pub quality: StageStatus,
    pub ats: StageStatus,

    pub revision_attempts: u32,
    pub quality_attempts: u32,
    /// Accepted revisions, each of which resumed the run at Validate.
    pub restarts: u32,

    /// Last extracted quality score on the /10 scale. 0 when the report had none.
    pub quality_score: Option<f64>,
    /// ATS score on the /100 scale.
    pub ats_score: Option<f64>,

    pub final_report: Option<ValidationReport>,
    pub artifact: Option<Artifact>,
    pub failure: Option<String>,
    pub outcome: Outcome,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            company: None,
            generation: StageStatus::NotRun,
            validation: StageStatus::NotRun,
            render: StageStatus::NotRun,
            quality: StageStatus::NotRun,
            ats: StageStatus::NotRun,
            revision_attempts: 0,
            quality_attempts: 0,
            restarts: 0,
            quality_score: None,
            ats_score: None,
            final_report: None,
            artifact: None,
            failure: None,
            outcome: Outcome::Aborted,
        }
    }

    /// A run that stopped before generation could start, e.g. for missing
    /// credentials.
    pub fn generation_failed(company: Option<String>, reason: impl Into<String>) -> Self {
        let mut summary = Self {
            company,
            generation: StageStatus::Failed,
            failure: Some(reason.into()),
            finished_at: Some(Utc::now()),
            ..Self::new()
        };
        summary.outcome = summary.derive_outcome();
        summary
    }

    /// Success iff Validate and Render both ended passed or skipped.
    pub fn derive_outcome(&self) -> Outcome {
        if self.validation.counts_as_pass() && self.render.counts_as_pass() {
            Outcome::Success
        } else if self.generation == StageStatus::Failed {
            Outcome::GenerationFailed
        } else if self.validation == StageStatus::Failed {
            Outcome::ValidationExhausted
        } else if self.render == StageStatus::Failed {
            Outcome::RenderFailed
        } else {
            Outcome::Aborted
        }
    }

    /// Console rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Run {}\n", self.run_id));
        if let Some(company) = &self.company {
            out.push_str(&format!("Company:     {company}\n"));
        }
        out.push_str(&format!("Generation:  {}\n", self.generation.label()));
        out.push_str(&format!(
            "Validation:  {} ({} revision attempts)\n",
            self.validation.label(),
            self.revision_attempts
        ));
        out.push_str(&format!("Render:      {}\n", self.render.label()));
        out.push_str(&format!(
            "Quality:     {}{} ({} attempts)\n",
            self.quality.label(),
            self.quality_score
                .map(|s| format!(", score {s}/10"))
                .unwrap_or_default(),
            self.quality_attempts
        ));
        out.push_str(&format!(
            "ATS:         {}{}\n",
            self.ats.label(),
            self.ats_score
                .map(|s| format!(", score {s}/100"))
                .unwrap_or_default()
        ));
        out.push_str(&format!("Restarts:    {}\n", self.restarts));
        if let Some(artifact) = &self.artifact {
            out.push_str(&format!("Source:      {}\n", artifact.source_path.display()));
            if let Some(pdf) = &artifact.pdf_path {
                out.push_str(&format!("PDF:         {}\n", pdf.display()));
            }
        }
        if let Some(failure) = &self.failure {
            out.push_str(&format!("Failure:     {failure}\n"));
        }
        if let (Outcome::ValidationExhausted, Some(report)) = (self.outcome, &self.final_report) {
            out.push('\n');
            out.push_str(&report.feedback());
        }
        out.push_str(&format!(
            "Outcome:     {:?} (exit {})\n",
            self.outcome,
            self.outcome.exit_code()
        ));
        out
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            Outcome::Success,
            Outcome::Aborted,
            Outcome::GenerationFailed,
            Outcome::ValidationExhausted,
            Outcome::RenderFailed,
        ]
        .map(Outcome::exit_code);
        assert_eq!(codes, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_skipped_stages_count_as_pass() {
        let summary = RunSummary {
            validation: StageStatus::Skipped,
            render: StageStatus::Passed,
            quality: StageStatus::AcceptedWithCaveat,
            ats: StageStatus::Errored,
            ..RunSummary::new()
        };
        assert_eq!(summary.derive_outcome(), Outcome::Success);
    }

    #[test]
    fn test_failures_map_to_outcomes() {
        let summary = RunSummary {
            generation: StageStatus::Failed,
            ..RunSummary::new()
        };
        assert_eq!(summary.derive_outcome(), Outcome::GenerationFailed);

        let summary = RunSummary {
            generation: StageStatus::Passed,
            validation: StageStatus::Failed,
            ..RunSummary::new()
        };
        assert_eq!(summary.derive_outcome(), Outcome::ValidationExhausted);

        let summary = RunSummary {
            validation: StageStatus::Passed,
            render: StageStatus::Failed,
            ..RunSummary::new()
        };
        assert_eq!(summary.derive_outcome(), Outcome::RenderFailed);
    }

    #[test]
    fn test_generation_failed_summary() {
        let summary = RunSummary::generation_failed(Some("Acme".into()), "no API key");
        assert_eq!(summary.generation, StageStatus::Failed);
        assert_eq!(summary.validation, StageStatus::NotRun);
        assert_eq!(summary.outcome, Outcome::GenerationFailed);
        assert_eq!(summary.outcome.exit_code(), 2);
        assert!(summary.finished_at.is_some());
        assert!(summary.render_text().contains("Failure:     no API key"));
    }

    #[test]
    fn test_render_text_mentions_scores() {
        let summary = RunSummary {
            quality: StageStatus::Passed,
            quality_score: Some(9.6),
            quality_attempts: 1,
            outcome: Outcome::Success,
            ..RunSummary::new()
        };
        let text = summary.render_text();
        assert!(text.contains("Quality:     passed, score 9.6/10 (1 attempts)"));
        assert!(text.contains("Outcome:     Success (exit 0)"));
    }
}
