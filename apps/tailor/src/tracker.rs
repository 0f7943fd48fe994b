//! Run history: one JSON line per pipeline run in `<output>/run_log.jsonl`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipeline::{Outcome, RunSummary};

pub const RUN_LOG_FILE: &str = "run_log.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
    pub company: Option<String>,
    pub outcome: Outcome,
    pub quality_score: Option<f64>,
    pub ats_score: Option<f64>,
    pub revision_attempts: u32,
    pub quality_attempts: u32,
    pub restarts: u32,
}

impl From<&RunSummary> for RunRecord {
    fn from(summary: &RunSummary) -> Self {
        Self {
            timestamp: summary.finished_at.unwrap_or(summary.started_at),
            run_id: summary.run_id,
            company: summary.company.clone(),
            outcome: summary.outcome,
            quality_score: summary.quality_score,
            ats_score: summary.ats_score,
            revision_attempts: summary.revision_attempts,
            quality_attempts: summary.quality_attempts,
            restarts: summary.restarts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    pub total: usize,
    pub successes: usize,
    pub by_company: BTreeMap<String, usize>,
    pub average_quality: Option<f64>,
    pub average_ats: Option<f64>,
}

impl History {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let mut by_company = BTreeMap::new();
        for record in records {
            let company = record.company.clone().unwrap_or_else(|| "(unknown)".to_string());
            *by_company.entry(company).or_insert(0) += 1;
        }
        Self {
            total: records.len(),
            successes: records.iter().filter(|r| r.outcome.is_success()).count(),
            by_company,
            average_quality: average(records.iter().filter_map(|r| r.quality_score)),
            average_ats: average(records.iter().filter_map(|r| r.ats_score)),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Runs: {} ({} successful)\n",
            self.total, self.successes
        );
        if let Some(q) = self.average_quality {
            out.push_str(&format!("Average quality: {q:.1}/10\n"));
        }
        if let Some(a) = self.average_ats {
            out.push_str(&format!("Average ATS: {a:.1}/100\n"));
        }
        if !self.by_company.is_empty() {
            out.push_str("By company:\n");
            for (company, count) in &self.by_company {
                out.push_str(&format!("  {company}: {count}\n"));
            }
        }
        out
    }
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub struct RunTracker {
    path: PathBuf,
}

impl RunTracker {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(RUN_LOG_FILE),
        }
    }

    pub async fn append(&self, record: &RunRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize run record: {e}")))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        debug!("Run {} appended to {}", record.run_id, self.path.display());
        Ok(())
    }

    /// All readable records. Corrupt lines are skipped with a warning.
    pub async fn records(&self) -> Result<Vec<RunRecord>, AppError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut records = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping corrupt run log line {}: {e}", i + 1),
            }
        }
        Ok(records)
    }

    pub async fn history(&self) -> Result<History, AppError> {
        Ok(History::from_records(&self.records().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: Option<&str>, outcome: Outcome, quality: Option<f64>) -> RunRecord {
        RunRecord {
            timestamp: Utc::now(),
            run_id: Uuid::new_v4(),
            company: company.map(str::to_string),
            outcome,
            quality_score: quality,
            ats_score: None,
            revision_attempts: 1,
            quality_attempts: 1,
            restarts: 1,
        }
    }

    #[tokio::test]
    async fn test_append_and_summarise() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = RunTracker::new(&dir.path().join("output"));

        tracker
            .append(&record(Some("Stripe"), Outcome::Success, Some(9.6)))
            .await
            .unwrap();
        tracker
            .append(&record(Some("Stripe"), Outcome::ValidationExhausted, None))
            .await
            .unwrap();
        tracker
            .append(&record(None, Outcome::Success, Some(9.0)))
            .await
            .unwrap();

        let history = tracker.history().await.unwrap();
        assert_eq!(history.total, 3);
        assert_eq!(history.successes, 2);
        assert_eq!(history.by_company.get("Stripe"), Some(&2));
        assert_eq!(history.by_company.get("(unknown)"), Some(&1));
        assert!((history.average_quality.unwrap() - 9.3).abs() < 1e-9);
        assert_eq!(history.average_ats, None);
        assert!(history.render_text().contains("Runs: 3 (2 successful)"));
    }

    #[tokio::test]
    async fn test_missing_log_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = RunTracker::new(dir.path());
        assert_eq!(tracker.history().await.unwrap(), History::default());
    }

    #[tokio::test]
    async fn test_corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = RunTracker::new(dir.path());
        tracker
            .append(&record(Some("Acme"), Outcome::Success, None))
            .await
            .unwrap();
        let path = dir.path().join(RUN_LOG_FILE);
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("{not json\n");
        std::fs::write(&path, text).unwrap();

        assert_eq!(tracker.records().await.unwrap().len(), 1);
    }

    #[test]
    fn test_record_from_summary() {
        let summary = RunSummary {
            company: Some("Stripe".to_string()),
            outcome: Outcome::RenderFailed,
            restarts: 2,
            ..RunSummary::new()
        };
        let record = RunRecord::from(&summary);
        assert_eq!(record.run_id, summary.run_id);
        assert_eq!(record.outcome, Outcome::RenderFailed);
        assert_eq!(record.restarts, 2);
        assert_eq!(record.timestamp, summary.started_at);
    }
}
