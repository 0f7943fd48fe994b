//! Document Renderer: fills the LaTeX template and optionally compiles it.

pub mod convert;
pub mod latex;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::pipeline::collaborators::Artifact;
use crate::pipeline::collaborators::DocumentRenderer;

/// File stem of every rendered artifact.
pub const OUTPUT_STEM: &str = "Generated_Resume";

pub struct LatexRenderer {
    template: String,
    output_dir: PathBuf,
    /// LaTeX engine binary. `None` writes the `.tex` only.
    engine: Option<String>,
}

impl LatexRenderer {
    pub fn new(template: String, output_dir: PathBuf, engine: Option<String>) -> Self {
        Self {
            template,
            output_dir,
            engine,
        }
    }

    /// Reads the template from disk.
    pub async fn from_template_file(
        template_path: &Path,
        output_dir: PathBuf,
        engine: Option<String>,
    ) -> Result<Self, AppError> {
        let template = tokio::fs::read_to_string(template_path).await.map_err(|e| {
            AppError::Config(format!(
                "cannot read template {}: {e}",
                template_path.display()
            ))
        })?;
        Ok(Self::new(template, output_dir, engine))
    }
}

#[async_trait]
impl DocumentRenderer for LatexRenderer {
    async fn render(&self, document: &ResumeDocument) -> Result<Artifact, AppError> {
        let source = latex::fill_template(&self.template, document)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let source_path = self.output_dir.join(format!("{OUTPUT_STEM}.tex"));
        tokio::fs::write(&source_path, source).await?;
        info!("LaTeX source written to {}", source_path.display());

        let pdf_path = match &self.engine {
            Some(engine) => Some(convert::compile_pdf(engine, &source_path, &self.output_dir).await?),
            None => None,
        };

        Ok(Artifact {
            source_path,
            pdf_path,
        })
    }
}
