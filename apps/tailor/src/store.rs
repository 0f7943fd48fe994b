//! File-backed persistence for the current application.
//!
//! One document file is the source of truth between commands. It is replaced
//! wholesale on every save (write to a temp file, then rename) and never
//! versioned.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::ResumeDocument;

pub const DOCUMENT_FILE: &str = "current_application.yaml";
pub const JOB_DESCRIPTION_FILE: &str = "current_jd.txt";
pub const CONSTRAINTS_FILE: &str = "constraints.yaml";
pub const PROFILE_FILE: &str = "profile.md";

#[derive(Debug, Clone)]
pub struct ApplicationStore {
    config_dir: PathBuf,
}

impl ApplicationStore {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn document_path(&self) -> PathBuf {
        self.config_dir.join(DOCUMENT_FILE)
    }

    pub fn job_description_path(&self) -> PathBuf {
        self.config_dir.join(JOB_DESCRIPTION_FILE)
    }

    pub fn constraints_path(&self) -> PathBuf {
        self.config_dir.join(CONSTRAINTS_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.config_dir.join(PROFILE_FILE)
    }

    pub async fn load_document(&self) -> Result<ResumeDocument, AppError> {
        self.load_document_from(&self.document_path()).await
    }

    /// Loads a document from an arbitrary path (e.g. `tailor validate other.yaml`).
    pub async fn load_document_from(&self, path: &Path) -> Result<ResumeDocument, AppError> {
        let text = read_required(path, "run `tailor generate` first").await?;
        ResumeDocument::from_yaml(&text)
    }

    pub async fn save_document(&self, document: &ResumeDocument) -> Result<(), AppError> {
        let yaml = document.to_yaml()?;
        self.write_atomic(self.document_path(), yaml).await?;
        debug!("Document saved to {}", self.document_path().display());
        Ok(())
    }

    pub async fn load_job_description(&self) -> Result<String, AppError> {
        read_required(&self.job_description_path(), "pass --jd or --jd-file").await
    }

    pub async fn save_job_description(&self, text: &str) -> Result<(), AppError> {
        self.write_atomic(self.job_description_path(), text.to_string())
            .await
    }

    /// Candidate profile. Missing is allowed: prompts then go without it.
    pub async fn load_reference_facts(&self) -> Result<String, AppError> {
        match tokio::fs::read_to_string(self.profile_path()).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "No candidate profile at {}; generating without reference facts",
                    self.profile_path().display()
                );
                Ok(String::new())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn write_atomic(&self, path: PathBuf, contents: String) -> Result<(), AppError> {
        let dir = self.config_dir.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(contents.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("write task failed: {e}")))??;
        Ok(())
    }
}

async fn read_required(path: &Path, hint: &str) -> Result<String, AppError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::Config(format!(
            "{} not found ({hint})",
            path.display()
        ))),
        Err(e) => Err(AppError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResumeDocument {
        ResumeDocument::from_yaml(
            "company_name: Stripe\nsummary: \"Ships **Rust**\"\nskills:\n  - category: Languages\n    items: Rust\n",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApplicationStore::new(dir.path().join("config"));

        store.save_document(&sample()).await.unwrap();
        assert_eq!(store.load_document().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApplicationStore::new(dir.path().to_path_buf());

        store.save_document(&sample()).await.unwrap();
        let smaller = ResumeDocument {
            summary: Some("only".to_string()),
            ..ResumeDocument::default()
        };
        store.save_document(&smaller).await.unwrap();

        let loaded = store.load_document().await.unwrap();
        assert_eq!(loaded, smaller);
        assert!(loaded.skills.is_none());
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_document_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApplicationStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.load_document().await,
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_job_description_round_trip_and_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApplicationStore::new(dir.path().to_path_buf());

        store.save_job_description("Rust engineer at Stripe").await.unwrap();
        assert_eq!(
            store.load_job_description().await.unwrap(),
            "Rust engineer at Stripe"
        );
        assert_eq!(store.load_reference_facts().await.unwrap(), "");
    }
}
