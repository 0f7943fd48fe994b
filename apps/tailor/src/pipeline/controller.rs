//! Pipeline Controller: generate → validate ⟲ revise → render → quality ⟲
//! revise → ATS.
//!
//! Every accepted revision (validation- or quality-driven) resumes the run at
//! Validate. The two revise budgets are independent and never reset within a
//! run, so the total number of restarts is bounded by their sum.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::evaluation::ScoreExtractor;
use crate::models::ResumeDocument;
use crate::pipeline::collaborators::{
    Artifact, ContentGenerator, DocumentRenderer, Evaluator, JobContext, Reviser,
};
use crate::pipeline::summary::{Outcome, RunSummary, StageStatus};
use crate::store::ApplicationStore;
use crate::validation::validate;

pub const DEFAULT_MAX_REVISION_ATTEMPTS: u32 = 5;
pub const DEFAULT_MAX_QUALITY_ATTEMPTS: u32 = 3;
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 9.5;
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_revision_attempts: u32,
    pub max_quality_attempts: u32,
    /// On the /10 scale.
    pub quality_threshold: f64,
    pub collaborator_timeout: Duration,
    pub skip_validation: bool,
    pub skip_render: bool,
    pub skip_quality: bool,
    pub skip_ats: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_revision_attempts: DEFAULT_MAX_REVISION_ATTEMPTS,
            max_quality_attempts: DEFAULT_MAX_QUALITY_ATTEMPTS,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            skip_validation: false,
            skip_render: false,
            skip_quality: false,
            skip_ats: false,
        }
    }
}

pub struct Collaborators {
    pub generator: Arc<dyn ContentGenerator>,
    pub reviser: Arc<dyn Reviser>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub quality: Arc<dyn Evaluator>,
    pub ats: Arc<dyn Evaluator>,
}

pub struct PipelineController {
    collaborators: Collaborators,
    options: PipelineOptions,
    store: Option<ApplicationStore>,
    quality_scores: ScoreExtractor,
    ats_scores: ScoreExtractor,
}

/// Where the quality stage left the run.
enum QualityVerdict {
    Done,
    Restart(ResumeDocument),
}

impl PipelineController {
    pub fn new(collaborators: Collaborators, options: PipelineOptions) -> Self {
        Self {
            collaborators,
            options,
            store: None,
            quality_scores: ScoreExtractor::quality(),
            ats_scores: ScoreExtractor::ats(),
        }
    }

    /// Persist every generated or revised document through `store`.
    pub fn with_store(mut self, store: ApplicationStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Runs the pipeline to completion. With `initial` the Generate stage is
    /// skipped and the run starts at Validate with that document.
    pub async fn run(&self, job: &JobContext, initial: Option<ResumeDocument>) -> RunSummary {
        let mut summary = RunSummary::new();
        info!("Pipeline run {} started", summary.run_id);

        match self.drive(job, initial, &mut summary).await {
            Ok(()) => summary.outcome = summary.derive_outcome(),
            Err(e) => {
                error!("Pipeline aborted: {e}");
                summary.failure = Some(e.to_string());
                summary.outcome = Outcome::Aborted;
            }
        }

        summary.finished_at = Some(Utc::now());
        info!(
            "Pipeline run {} finished: {:?} after {} restarts",
            summary.run_id, summary.outcome, summary.restarts
        );
        summary
    }

    /// Stage failures are recorded in `summary` and end the run with `Ok`;
    /// `Err` is reserved for failures outside every stage (persistence).
    async fn drive(
        &self,
        job: &JobContext,
        initial: Option<ResumeDocument>,
        summary: &mut RunSummary,
    ) -> Result<(), AppError> {
        let mut document = match initial {
            Some(document) => {
                summary.generation = StageStatus::Skipped;
                document
            }
            None => {
                info!("Stage: generate");
                match self
                    .bounded("generate", self.collaborators.generator.generate(job))
                    .await
                {
                    Ok(document) => {
                        summary.generation = StageStatus::Passed;
                        self.persist(&document).await?;
                        document
                    }
                    Err(e) => {
                        error!("Generation failed: {e}");
                        summary.generation = StageStatus::Failed;
                        summary.failure = Some(e.to_string());
                        return Ok(());
                    }
                }
            }
        };
        summary.company = document.company_name.clone();

        loop {
            // ── Validate ────────────────────────────────────────────────────
            if self.options.skip_validation {
                summary.validation = StageStatus::Skipped;
            } else {
                let report = validate(&document, &job.schema);
                let passed = report.passed();
                let feedback = report.feedback();
                summary.final_report = Some(report);

                if !passed {
                    if summary.revision_attempts >= self.options.max_revision_attempts {
                        error!(
                            "Validation still failing after {} revision attempts",
                            summary.revision_attempts
                        );
                        summary.validation = StageStatus::Failed;
                        summary.failure = Some(format!(
                            "validation failed after {} revision attempts",
                            summary.revision_attempts
                        ));
                        return Ok(());
                    }

                    summary.revision_attempts += 1;
                    warn!(
                        "Validation failed; revision attempt {}/{}",
                        summary.revision_attempts, self.options.max_revision_attempts
                    );
                    if let Some(revised) = self.revise(&document, &feedback, job).await {
                        document = self.accept_revision(revised, summary).await?;
                    }
                    continue;
                }

                info!("Validation passed");
                summary.validation = StageStatus::Passed;
            }

            // ── Render ──────────────────────────────────────────────────────
            let artifact = if self.options.skip_render {
                summary.render = StageStatus::Skipped;
                None
            } else {
                info!("Stage: render");
                match self
                    .bounded("render", self.collaborators.renderer.render(&document))
                    .await
                {
                    Ok(artifact) => {
                        summary.render = StageStatus::Passed;
                        summary.artifact = Some(artifact.clone());
                        Some(artifact)
                    }
                    Err(e) => {
                        error!("Render failed: {e}");
                        summary.render = StageStatus::Failed;
                        summary.failure = Some(e.to_string());
                        return Ok(());
                    }
                }
            };

            // ── Quality ─────────────────────────────────────────────────────
            match (&artifact, self.options.skip_quality) {
                (_, true) | (None, _) => summary.quality = StageStatus::Skipped,
                (Some(artifact), false) => {
                    match self.quality_stage(&document, artifact, job, summary).await {
                        QualityVerdict::Restart(revised) => {
                            document = self.accept_revision(revised, summary).await?;
                            continue;
                        }
                        QualityVerdict::Done => {}
                    }
                }
            }

            // ── ATS ─────────────────────────────────────────────────────────
            match (&artifact, self.options.skip_ats) {
                (_, true) | (None, _) => summary.ats = StageStatus::Skipped,
                (Some(artifact), false) => self.ats_stage(artifact, job, summary).await,
            }

            return Ok(());
        }
    }

    /// Evaluates until the score clears the threshold, the budget runs out, or
    /// a revision is accepted (which restarts the run at Validate).
    async fn quality_stage(
        &self,
        document: &ResumeDocument,
        artifact: &Artifact,
        job: &JobContext,
        summary: &mut RunSummary,
    ) -> QualityVerdict {
        loop {
            if summary.quality_attempts >= self.options.max_quality_attempts {
                warn!(
                    "Quality budget exhausted ({} attempts); accepting with caveat",
                    summary.quality_attempts
                );
                summary.quality = StageStatus::AcceptedWithCaveat;
                return QualityVerdict::Done;
            }
            summary.quality_attempts += 1;
            info!(
                "Stage: quality (attempt {}/{})",
                summary.quality_attempts, self.options.max_quality_attempts
            );

            let report = match self
                .bounded(
                    "quality",
                    self.collaborators
                        .quality
                        .evaluate(artifact, &job.job_description),
                )
                .await
            {
                Ok(report) => report,
                Err(e) => {
                    warn!("Quality check failed: {e}");
                    continue;
                }
            };

            let score = match self.quality_scores.extract(&report) {
                Some(score) => score.value,
                None => {
                    warn!("Quality report carried no score; treating as 0");
                    0.0
                }
            };
            summary.quality_score = Some(score);

            if score >= self.options.quality_threshold {
                info!("Quality score {score}/10 meets threshold");
                summary.quality = StageStatus::Passed;
                return QualityVerdict::Done;
            }

            if summary.quality_attempts >= self.options.max_quality_attempts {
                continue;
            }

            warn!(
                "Quality score {score}/10 below {}; revising",
                self.options.quality_threshold
            );
            if let Some(revised) = self.revise(document, &report, job).await {
                return QualityVerdict::Restart(revised);
            }
        }
    }

    async fn ats_stage(&self, artifact: &Artifact, job: &JobContext, summary: &mut RunSummary) {
        info!("Stage: ats");
        match self
            .bounded(
                "ats",
                self.collaborators.ats.evaluate(artifact, &job.job_description),
            )
            .await
        {
            Ok(report) => {
                summary.ats = StageStatus::Passed;
                summary.ats_score = self.ats_scores.extract(&report).map(|s| s.value);
                match summary.ats_score {
                    Some(score) => info!("ATS score {score}/100"),
                    None => warn!("ATS report carried no score"),
                }
            }
            Err(e) => {
                warn!("ATS check failed (informational): {e}");
                summary.ats = StageStatus::Errored;
            }
        }
    }

    /// One revise call. Failures are logged and reported as `None`; the
    /// caller has already charged the attempt.
    async fn revise(
        &self,
        document: &ResumeDocument,
        feedback: &str,
        job: &JobContext,
    ) -> Option<ResumeDocument> {
        match self
            .bounded(
                "revise",
                self.collaborators.reviser.revise(document, feedback, job),
            )
            .await
        {
            Ok(revised) => Some(revised),
            Err(e) => {
                warn!("Revision rejected: {e}");
                None
            }
        }
    }

    async fn accept_revision(
        &self,
        revised: ResumeDocument,
        summary: &mut RunSummary,
    ) -> Result<ResumeDocument, AppError> {
        self.persist(&revised).await?;
        summary.restarts += 1;
        if revised.company_name.is_some() {
            summary.company = revised.company_name.clone();
        }
        info!("Revision accepted; restarting at validate (restart {})", summary.restarts);
        Ok(revised)
    }

    async fn persist(&self, document: &ResumeDocument) -> Result<(), AppError> {
        match &self.store {
            Some(store) => store.save_document(document).await,
            None => Ok(()),
        }
    }

    /// Applies the collaborator timeout to one call.
    async fn bounded<T>(
        &self,
        stage: &'static str,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        let after = self.options.collaborator_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout { stage, after }),
        }
    }
}
