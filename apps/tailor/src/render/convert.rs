//! `.tex` → `.pdf` through an external LaTeX engine.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::AppError;

/// Lines of engine output kept in a failure message.
const LOG_TAIL_LINES: usize = 20;

/// Compiles `tex_path` into `out_dir` with `engine` (e.g. `pdflatex`) and
/// returns the PDF path.
pub async fn compile_pdf(engine: &str, tex_path: &Path, out_dir: &Path) -> Result<PathBuf, AppError> {
    info!("Compiling {} with {engine}", tex_path.display());

    let output = Command::new(engine)
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error")
        .arg(format!("-output-directory={}", out_dir.display()))
        .arg(tex_path)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| AppError::Render(format!("could not start {engine}: {e}")))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        warn!("{engine} exited with {}", output.status);
        return Err(AppError::Render(format!(
            "{engine} exited with {}:\n{}",
            output.status,
            log_tail(&stdout, LOG_TAIL_LINES)
        )));
    }
    debug!("{engine} output:\n{}", log_tail(&stdout, LOG_TAIL_LINES));

    let stem = tex_path
        .file_stem()
        .ok_or_else(|| AppError::Render(format!("no file name in {}", tex_path.display())))?;
    let pdf_path = out_dir.join(stem).with_extension("pdf");
    if !tokio::fs::try_exists(&pdf_path).await? {
        return Err(AppError::Render(format!(
            "{engine} succeeded but {} was not produced",
            pdf_path.display()
        )));
    }

    info!("PDF written to {}", pdf_path.display());
    Ok(pdf_path)
}

/// Last `n` non-empty lines of `log`.
pub fn log_tail(log: &str, n: usize) -> String {
    let lines: Vec<&str> = log.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tail_keeps_last_lines() {
        let log = "a\n\nb\nc\n  \nd\n";
        assert_eq!(log_tail(log, 2), "c\nd");
        assert_eq!(log_tail(log, 10), "a\nb\nc\nd");
        assert_eq!(log_tail("", 3), "");
    }

    #[tokio::test]
    async fn test_missing_engine_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("resume.tex");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();

        let err = compile_pdf("tailor-no-such-latex-engine", &tex, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }
}
