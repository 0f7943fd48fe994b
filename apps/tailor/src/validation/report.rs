//! Validation report types.
//!
//! Every measurable violation carries the direction and size of the fix
//! ("add 12 characters", "remove 1 bold marker"). The rendered report is fed
//! back verbatim to the reviser, so the wording is part of the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Units and corrections
// ────────────────────────────────────────────────────────────────────────────

/// What a measured quantity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Characters,
    BoldMarkers,
    Bullets,
    Categories,
    Projects,
}

impl Unit {
    pub fn label(self, amount: usize) -> &'static str {
        let one = amount == 1;
        match self {
            Unit::Characters if one => "character",
            Unit::Characters => "characters",
            Unit::BoldMarkers if one => "bold marker",
            Unit::BoldMarkers => "bold markers",
            Unit::Bullets if one => "bullet",
            Unit::Bullets => "bullets",
            Unit::Categories if one => "category",
            Unit::Categories => "categories",
            Unit::Projects if one => "project",
            Unit::Projects => "projects",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Add,
    Remove,
}

/// The fix for a numeric violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub direction: Direction,
    pub amount: usize,
    pub unit: Unit,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.direction {
            Direction::Add => "add",
            Direction::Remove => "remove",
        };
        write!(f, "{verb} {} {}", self.amount, self.unit.label(self.amount))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Violations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Measured value outside an inclusive range. Either bound may be absent.
    OutOfRange {
        metric: String,
        unit: Unit,
        measured: usize,
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Measured value differs from a required exact count.
    CountMismatch {
        metric: String,
        unit: Unit,
        measured: usize,
        expected: usize,
    },
    MissingSection,
    /// A keyed entry (an experience company) has no counterpart in the document.
    MissingEntry,
    MissingField { field: String },
    MissingKeyword { keyword: String },
    ValueMismatch {
        field: String,
        expected: String,
        actual: Option<String>,
    },
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ConstraintErrorRecord", from = "ConstraintErrorRecord")]
pub struct ConstraintError {
    /// Human-readable location, e.g. `summary`, `experience[Infosys] bullet 3`.
    pub location: String,
    pub violation: Violation,
}

/// Serialized form of a `ConstraintError`: the stored fields plus the derived
/// measurement, signed delta and correction. The derived fields are ignored
/// when reading back.
#[derive(Serialize, Deserialize)]
struct ConstraintErrorRecord {
    location: String,
    violation: Violation,
    #[serde(default)]
    measured: Option<usize>,
    #[serde(default)]
    delta: Option<i64>,
    #[serde(default)]
    correction: Option<Correction>,
}

impl From<ConstraintError> for ConstraintErrorRecord {
    fn from(error: ConstraintError) -> Self {
        Self {
            measured: error.measured(),
            delta: error.delta(),
            correction: error.correction(),
            location: error.location,
            violation: error.violation,
        }
    }
}

impl From<ConstraintErrorRecord> for ConstraintError {
    fn from(record: ConstraintErrorRecord) -> Self {
        Self::new(record.location, record.violation)
    }
}

impl ConstraintError {
    pub fn new(location: impl Into<String>, violation: Violation) -> Self {
        Self {
            location: location.into(),
            violation,
        }
    }

    /// Measured value for numeric violations.
    pub fn measured(&self) -> Option<usize> {
        match &self.violation {
            Violation::OutOfRange { measured, .. } | Violation::CountMismatch { measured, .. } => {
                Some(*measured)
            }
            _ => None,
        }
    }

    /// Signed distance to the nearest acceptable value: positive means add,
    /// negative means remove. `None` for non-numeric violations.
    pub fn delta(&self) -> Option<i64> {
        self.correction().map(|c| match c.direction {
            Direction::Add => c.amount as i64,
            Direction::Remove => -(c.amount as i64),
        })
    }

    pub fn correction(&self) -> Option<Correction> {
        match &self.violation {
            Violation::OutOfRange {
                unit,
                measured,
                min,
                max,
                ..
            } => match (min, max) {
                (Some(min), _) if measured < min => Some(Correction {
                    direction: Direction::Add,
                    amount: min - measured,
                    unit: *unit,
                }),
                (_, Some(max)) if measured > max => Some(Correction {
                    direction: Direction::Remove,
                    amount: measured - max,
                    unit: *unit,
                }),
                _ => None,
            },
            Violation::CountMismatch {
                unit,
                measured,
                expected,
                ..
            } => {
                if measured < expected {
                    Some(Correction {
                        direction: Direction::Add,
                        amount: expected - measured,
                        unit: *unit,
                    })
                } else if measured > expected {
                    Some(Correction {
                        direction: Direction::Remove,
                        amount: measured - expected,
                        unit: *unit,
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn describe_bounds(min: Option<usize>, max: Option<usize>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!("at least {min}"),
        (None, Some(max)) => format!("max {max}"),
        (None, None) => "any".to_string(),
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.violation {
            Violation::OutOfRange {
                metric,
                measured,
                min,
                max,
                ..
            } => write!(
                f,
                "{} {metric}: {measured} (need {})",
                self.location,
                describe_bounds(*min, *max)
            )?,
            Violation::CountMismatch {
                metric,
                measured,
                expected,
                ..
            } => write!(
                f,
                "{} {metric}: {measured} (need exactly {expected})",
                self.location
            )?,
            Violation::MissingSection => write!(f, "{}: section missing", self.location)?,
            Violation::MissingEntry => write!(f, "{}: no matching entry", self.location)?,
            Violation::MissingField { field } => {
                write!(f, "{}: missing required field '{field}'", self.location)?
            }
            Violation::MissingKeyword { keyword } => {
                write!(f, "{}: missing required keyword '{keyword}'", self.location)?
            }
            Violation::ValueMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{}: {field} mismatch (expected '{expected}', got '{}')",
                self.location,
                actual.as_deref().unwrap_or("")
            )?,
        }
        if let Some(correction) = self.correction() {
            write!(f, " -> {correction}")?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Identifiers of checks that passed, in evaluation order.
    pub passes: Vec<String>,
    /// Advisory findings. Never affect `passed()`.
    pub warnings: Vec<String>,
    pub errors: Vec<ConstraintError>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn pass(&mut self, check: impl Into<String>) {
        self.passes.push(check.into());
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub(crate) fn fail(&mut self, location: impl Into<String>, violation: Violation) {
        self.errors.push(ConstraintError::new(location, violation));
    }

    /// Errors whose location starts with `prefix` (e.g. `"summary"`).
    pub fn errors_at<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ConstraintError> {
        self.errors
            .iter()
            .filter(move |e| e.location.starts_with(prefix))
    }

    /// Plain-text rendering used both on the console and as revision feedback.
    pub fn feedback(&self) -> String {
        let mut out = String::new();
        let checks = count(self.passes.len(), "check", "checks");
        if self.passed() {
            out.push_str(&format!("VALIDATION PASSED: {checks}, 0 errors\n"));
        } else {
            out.push_str(&format!(
                "VALIDATION FAILED: {} ({checks} passed)\n\nErrors:\n",
                count(self.errors.len(), "error", "errors")
            ));
            for (i, e) in self.errors.iter().enumerate() {
                out.push_str(&format!("  {}. {e}\n", i + 1));
            }
        }
        if !self.warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in &self.warnings {
                out.push_str(&format!("  - {w}\n"));
            }
        }
        out
    }
}

fn count(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(measured: usize, min: Option<usize>, max: Option<usize>) -> ConstraintError {
        ConstraintError::new(
            "summary",
            Violation::OutOfRange {
                metric: "length".to_string(),
                unit: Unit::Characters,
                measured,
                min,
                max,
            },
        )
    }

    #[test]
    fn test_below_min_is_addition() {
        let e = range(430, Some(450), Some(520));
        assert_eq!(e.delta(), Some(20));
        assert_eq!(e.to_string(), "summary length: 430 (need 450-520) -> add 20 characters");
    }

    #[test]
    fn test_above_max_is_removal() {
        let e = range(530, Some(450), Some(520));
        assert_eq!(e.delta(), Some(-10));
        assert!(e.to_string().ends_with("remove 10 characters"));
    }

    #[test]
    fn test_max_only_bound_formats() {
        let e = range(251, None, Some(250));
        assert_eq!(e.to_string(), "summary length: 251 (need max 250) -> remove 1 character");
    }

    #[test]
    fn test_count_mismatch_wording() {
        let e = ConstraintError::new(
            "skills",
            Violation::CountMismatch {
                metric: "category count".to_string(),
                unit: Unit::Categories,
                measured: 6,
                expected: 7,
            },
        );
        assert_eq!(e.delta(), Some(1));
        assert_eq!(
            e.to_string(),
            "skills category count: 6 (need exactly 7) -> add 1 category"
        );
    }

    #[test]
    fn test_non_numeric_violation_has_no_delta() {
        let e = ConstraintError::new(
            "projects[1]",
            Violation::MissingField {
                field: "github".to_string(),
            },
        );
        assert_eq!(e.delta(), None);
        assert_eq!(e.measured(), None);
        assert_eq!(e.to_string(), "projects[1]: missing required field 'github'");
    }

    #[test]
    fn test_bold_marker_correction_label() {
        let e = ConstraintError::new(
            "summary",
            Violation::OutOfRange {
                metric: "bold markers".to_string(),
                unit: Unit::BoldMarkers,
                measured: 2,
                min: Some(5),
                max: Some(8),
            },
        );
        assert!(e.to_string().ends_with("add 3 bold markers"));
    }

    #[test]
    fn test_warnings_do_not_fail_report() {
        let mut report = ValidationReport::default();
        report.pass("summary.length");
        report.warn("github link looks wrong");
        assert!(report.passed());
        assert!(report.feedback().contains("VALIDATION PASSED"));
        assert!(report.feedback().contains("github link looks wrong"));
    }

    #[test]
    fn test_feedback_numbers_errors() {
        let mut report = ValidationReport::default();
        report.fail(
            "summary",
            Violation::MissingKeyword {
                keyword: "3.89 GPA".to_string(),
            },
        );
        report.errors.push(range(530, Some(450), Some(520)));
        let text = report.feedback();
        assert!(text.starts_with("VALIDATION FAILED: 2 errors"));
        assert!(text.contains("  1. summary: missing required keyword '3.89 GPA'"));
        assert!(text.contains("  2. summary length: 530"));
    }

    #[test]
    fn test_feedback_single_error_is_singular() {
        let mut report = ValidationReport::default();
        report.pass("summary.bold");
        report.errors.push(range(530, Some(450), Some(520)));
        assert!(report
            .feedback()
            .starts_with("VALIDATION FAILED: 1 error (1 check passed)\n"));
    }

    #[test]
    fn test_json_carries_delta_and_correction() {
        let value = serde_json::to_value(range(530, Some(450), Some(520))).unwrap();
        assert_eq!(value["location"], "summary");
        assert_eq!(value["violation"]["kind"], "out_of_range");
        assert_eq!(value["measured"], 530);
        assert_eq!(value["delta"], -10);
        assert_eq!(value["correction"]["direction"], "remove");
        assert_eq!(value["correction"]["amount"], 10);

        let back: ConstraintError = serde_json::from_value(value).unwrap();
        assert_eq!(back, range(530, Some(450), Some(520)));
    }

    #[test]
    fn test_json_non_numeric_error_has_null_delta() {
        let e = ConstraintError::new("experience[Infosys]", Violation::MissingEntry);
        let value = serde_json::to_value(&e).unwrap();
        assert!(value["delta"].is_null());
        assert!(value["correction"].is_null());
    }
}
