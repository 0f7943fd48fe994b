//! Score extraction from free-text evaluation reports.
//!
//! Reviewers are asked to end with a fixed line ("OVERALL CONTENT SCORE: 9/10",
//! "TOTAL SCORE: 82/100"). When that line is missing the extractor returns
//! `None`; it never guesses from other numbers in the text.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f64,
    pub scale: f64,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.value, self.scale)
    }
}

pub struct ScoreExtractor {
    pattern: Regex,
    scale: f64,
}

impl ScoreExtractor {
    /// `OVERALL [RESUME|CONTENT] SCORE: X/10`.
    pub fn quality() -> Self {
        Self {
            pattern: Regex::new(
                r"(?i)OVERALL(?:\s+(?:RESUME|CONTENT))?\s+SCORE\W*?(\d+(?:\.\d+)?)\s*/\s*10\b",
            )
            .expect("quality score pattern is valid"),
            scale: 10.0,
        }
    }

    /// `TOTAL [ATS] SCORE: X/100`.
    pub fn ats() -> Self {
        Self {
            pattern: Regex::new(r"(?i)TOTAL(?:\s+ATS)?\s+SCORE\W*?(\d+(?:\.\d+)?)\s*/\s*100\b")
                .expect("ats score pattern is valid"),
            scale: 100.0,
        }
    }

    /// First matching score line. Values above the scale are rejected.
    pub fn extract(&self, report: &str) -> Option<Score> {
        let caps = self.pattern.captures(report)?;
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        if value > self.scale {
            return None;
        }
        Some(Score {
            value,
            scale: self.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_score_variants() {
        let q = ScoreExtractor::quality();
        assert_eq!(q.extract("OVERALL CONTENT SCORE: 9.6/10").map(|s| s.value), Some(9.6));
        assert_eq!(q.extract("Overall Resume Score: 8 / 10").map(|s| s.value), Some(8.0));
        assert_eq!(q.extract("**OVERALL SCORE:** 7.5/10").map(|s| s.value), Some(7.5));
    }

    #[test]
    fn test_quality_ignores_section_scores() {
        let q = ScoreExtractor::quality();
        let report = "SECTION SCORE: 9/10\n- Summary: 8/10\nRATING: GOOD";
        assert_eq!(q.extract(report), None);
    }

    #[test]
    fn test_quality_rejects_percent_scale() {
        let q = ScoreExtractor::quality();
        assert_eq!(q.extract("OVERALL SCORE: 95/100"), None);
    }

    #[test]
    fn test_ats_score() {
        let a = ScoreExtractor::ats();
        let report = "KEYWORD MATCHING (/30):\n- Score: 25/30\nTOTAL SCORE: 86/100\nVERDICT: PASS";
        let score = a.extract(report).unwrap();
        assert_eq!(score.value, 86.0);
        assert_eq!(score.to_string(), "86/100");
        assert_eq!(score.scale, 100.0);
    }

    #[test]
    fn test_missing_or_placeholder_score_is_none() {
        let a = ScoreExtractor::ats();
        assert_eq!(a.extract("TOTAL SCORE: [X]/100"), None);
        assert_eq!(a.extract(""), None);
        assert_eq!(a.extract("TOTAL SCORE: 140/100"), None);
    }
}
