//! Pipeline Controller and the collaborator seams it drives.

pub mod collaborators;
pub mod controller;
#[cfg(test)]
pub mod fakes;
pub mod summary;

pub use collaborators::{Artifact, ContentGenerator, DocumentRenderer, Evaluator, JobContext, Reviser};
pub use controller::{Collaborators, PipelineController, PipelineOptions};
pub use summary::{Outcome, RunSummary};
