//! In-memory collaborators for controller tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::pipeline::collaborators::{
    Artifact, ContentGenerator, DocumentRenderer, Evaluator, JobContext, Reviser,
};

/// What a fake does on one call.
#[derive(Debug, Clone)]
pub enum Step<T> {
    Return(T),
    Fail(String),
    /// Sleeps far beyond any test timeout.
    Hang,
}

impl<T: Clone> Step<T> {
    async fn play(&self) -> Result<T, AppError> {
        match self {
            Step::Return(value) => Ok(value.clone()),
            Step::Fail(message) => Err(AppError::Collaborator(message.clone())),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::Collaborator("hang finished".to_string()))
            }
        }
    }
}

/// Plays queued steps in order, then repeats `fallback` forever.
pub struct Script<T> {
    queue: Mutex<VecDeque<Step<T>>>,
    fallback: Step<T>,
    calls: Mutex<Vec<String>>,
}

impl<T: Clone> Script<T> {
    pub fn always(step: Step<T>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: step,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then(steps: Vec<Step<T>>, fallback: Step<T>) -> Self {
        Self {
            queue: Mutex::new(steps.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn next(&self, input: String) -> Step<T> {
        self.calls.lock().unwrap().push(input);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Inputs seen so far (feedback text for the reviser).
    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub struct FakeGenerator(pub Script<ResumeDocument>);

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(&self, job: &JobContext) -> Result<ResumeDocument, AppError> {
        self.0.next(job.job_description.clone()).play().await
    }
}

pub struct FakeReviser(pub Script<ResumeDocument>);

#[async_trait]
impl Reviser for FakeReviser {
    async fn revise(
        &self,
        _current: &ResumeDocument,
        feedback: &str,
        _job: &JobContext,
    ) -> Result<ResumeDocument, AppError> {
        self.0.next(feedback.to_string()).play().await
    }
}

pub struct FakeRenderer(pub Script<Artifact>);

impl FakeRenderer {
    pub fn ok() -> Self {
        Self(Script::always(Step::Return(fake_artifact())))
    }
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render(&self, document: &ResumeDocument) -> Result<Artifact, AppError> {
        self.0
            .next(document.summary.clone().unwrap_or_default())
            .play()
            .await
    }
}

pub struct FakeEvaluator(pub Script<String>);

impl FakeEvaluator {
    pub fn reporting(report: &str) -> Self {
        Self(Script::always(Step::Return(report.to_string())))
    }
}

#[async_trait]
impl Evaluator for FakeEvaluator {
    async fn evaluate(&self, artifact: &Artifact, _job_description: &str) -> Result<String, AppError> {
        self.0
            .next(artifact.source_path.display().to_string())
            .play()
            .await
    }
}

pub fn fake_artifact() -> Artifact {
    Artifact {
        source_path: PathBuf::from("output/Generated_Resume.tex"),
        pdf_path: Some(PathBuf::from("output/Generated_Resume.pdf")),
    }
}
