use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::pipeline::controller::{
    DEFAULT_MAX_QUALITY_ATTEMPTS, DEFAULT_MAX_REVISION_ATTEMPTS, DEFAULT_QUALITY_THRESHOLD,
};

/// `TAILOR_LATEX_ENGINE` value that turns PDF compilation off.
pub const NO_ENGINE: &str = "none";

/// Application configuration loaded from environment variables.
/// Only commands that call the model require `ANTHROPIC_API_KEY`.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    /// Root holding `config/`, `output/` and `templates/`.
    pub home: PathBuf,
    pub template_path: PathBuf,
    /// `None` writes `.tex` only.
    pub latex_engine: Option<String>,
    pub llm_timeout: Duration,
    pub max_revision_attempts: u32,
    pub max_quality_attempts: u32,
    pub quality_threshold: f64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let home = PathBuf::from(lookup("TAILOR_HOME").unwrap_or_else(|| ".".to_string()));
        let template_path = lookup("TAILOR_TEMPLATE")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("templates").join("resume.tex"));
        let latex_engine = match lookup("TAILOR_LATEX_ENGINE") {
            Some(engine) if engine.eq_ignore_ascii_case(NO_ENGINE) => None,
            Some(engine) => Some(engine),
            None => Some("pdflatex".to_string()),
        };

        Ok(Config {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty()),
            home,
            template_path,
            latex_engine,
            llm_timeout: Duration::from_secs(parse_env(&lookup, "TAILOR_LLM_TIMEOUT_SECS", 120)?),
            max_revision_attempts: parse_env(
                &lookup,
                "TAILOR_MAX_REVISIONS",
                DEFAULT_MAX_REVISION_ATTEMPTS,
            )?,
            max_quality_attempts: parse_env(
                &lookup,
                "TAILOR_MAX_QUALITY_ATTEMPTS",
                DEFAULT_MAX_QUALITY_ATTEMPTS,
            )?,
            quality_threshold: parse_env(
                &lookup,
                "TAILOR_QUALITY_THRESHOLD",
                DEFAULT_QUALITY_THRESHOLD,
            )?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn config_dir(&self) -> PathBuf {
        self.home.join("config")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.home.join("output")
    }

    pub fn require_api_key(&self) -> Result<String> {
        self.anthropic_api_key
            .clone()
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")
    }
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
