//! Declarative constraint schema, loaded from `constraints.yaml`.
//!
//! Every bound is optional: `None` means "not enforced". Ranges are inclusive on
//! both ends. `exact_*` fields require equality.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::GITHUB_SENTINEL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<SkillsRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<ProjectsRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderRules {
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Field name → exact expected value. Any difference is an error.
    #[serde(default)]
    pub exact_values: BTreeMap<String, String>,
}

/// Which character-count policy applies to the summary.
///
/// A deployment declares exactly one. `Range` checks both ends of
/// `[min_chars, max_chars]`; `MaxOnly` ignores `min_chars`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    #[default]
    Range,
    MaxOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRules {
    #[serde(default)]
    pub policy: SummaryPolicy,
    pub min_chars: Option<usize>,
    pub max_chars: Option<usize>,
    pub min_bold: Option<usize>,
    pub max_bold: Option<usize>,
    /// Case-sensitive substrings that must appear verbatim in the summary.
    #[serde(default)]
    pub required_keywords: Vec<String>,
}

impl SummaryRules {
    /// The lower character bound in effect under the declared policy.
    pub fn effective_min_chars(&self) -> Option<usize> {
        match self.policy {
            SummaryPolicy::Range => self.min_chars,
            SummaryPolicy::MaxOnly => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsRules {
    pub exact_categories: Option<usize>,
    /// 0 is treated the same as absent: no lower bound.
    pub items_min_chars: Option<usize>,
    pub items_max_chars: Option<usize>,
    pub category_name_max_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRules {
    /// Keyed by company name. Entries in the document whose company is not a
    /// key here are not checked.
    #[serde(default)]
    pub companies: BTreeMap<String, CompanyRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRules {
    pub exact_bullets: Option<usize>,
    pub bullet_min_chars: Option<usize>,
    pub bullet_max_chars: Option<usize>,
    pub bullet_min_bold: Option<usize>,
    pub bullet_max_bold: Option<usize>,
    /// Field name → exact expected value (e.g. `role`, `duration`).
    #[serde(default)]
    pub required_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectsRules {
    pub exact_count: Option<usize>,
    #[serde(default = "default_project_fields")]
    pub required_fields: Vec<String>,
    pub tech_max_chars: Option<usize>,
    pub bullet_min_chars: Option<usize>,
    pub bullet_max_chars: Option<usize>,
    pub bullet_min_bold: Option<usize>,
    pub bullet_max_bold: Option<usize>,
    #[serde(default = "default_github_sentinel")]
    pub github_sentinel: String,
    #[serde(default = "default_github_prefixes")]
    pub github_url_prefixes: Vec<String>,
}

/// The two emphasis-marked bullet fields every project carries.
pub const PROJECT_BULLET_FIELDS: [&str; 2] = ["bullet1", "bullet2"];

fn default_project_fields() -> Vec<String> {
    ["title", "tech", "github", "bullet1", "bullet2"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_github_sentinel() -> String {
    GITHUB_SENTINEL.to_string()
}

fn default_github_prefixes() -> Vec<String> {
    vec!["https://github.com/".to_string()]
}

impl Default for ProjectsRules {
    fn default() -> Self {
        Self {
            exact_count: None,
            required_fields: default_project_fields(),
            tech_max_chars: None,
            bullet_min_chars: None,
            bullet_max_chars: None,
            bullet_min_bold: None,
            bullet_max_bold: None,
            github_sentinel: default_github_sentinel(),
            github_url_prefixes: default_github_prefixes(),
        }
    }
}

impl Default for ConstraintSchema {
    /// Fallback limits used when no `constraints.yaml` exists. No companies are
    /// configured, so experience bullets go unchecked.
    fn default() -> Self {
        Self {
            header: None,
            summary: Some(SummaryRules {
                policy: SummaryPolicy::Range,
                min_chars: Some(450),
                max_chars: Some(520),
                min_bold: Some(5),
                max_bold: Some(8),
                required_keywords: vec![],
            }),
            skills: Some(SkillsRules {
                exact_categories: Some(7),
                items_min_chars: Some(35),
                items_max_chars: Some(95),
                category_name_max_chars: None,
            }),
            experience: Some(ExperienceRules::default()),
            projects: Some(ProjectsRules {
                exact_count: Some(3),
                tech_max_chars: Some(80),
                bullet_max_chars: Some(250),
                bullet_min_bold: Some(3),
                bullet_max_bold: Some(5),
                ..ProjectsRules::default()
            }),
        }
    }
}

impl ConstraintSchema {
    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(text)
            .map_err(|e| AppError::Config(format!("invalid constraint schema: {e}")))
    }

    /// Loads the schema from `path`. A missing file falls back to
    /// [`ConstraintSchema::default`]; an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let schema = Self::from_yaml(&text)?;
                info!("Constraints loaded from {}", path.display());
                Ok(schema)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Constraints file not found at {}; using built-in defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Serialized form handed to the model as part of generation prompts.
    pub fn to_yaml(&self) -> Result<String, AppError> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize constraints: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
header:
  required_fields: [name, title, contact]
  exact_values:
    name: "Ada Lovelace"
summary:
  policy: max_only
  max_chars: 520
  max_bold: 8
  required_keywords: ["3.89 GPA"]
skills:
  exact_categories: 7
  items_max_chars: 95
experience:
  companies:
    Infosys:
      exact_bullets: 4
      bullet_min_chars: 150
      bullet_max_chars: 250
      required_fields:
        role: "Senior Systems Engineer"
projects:
  exact_count: 3
  tech_max_chars: 80
"#;

    #[test]
    fn test_parse_schema_with_all_sections() {
        let schema = ConstraintSchema::from_yaml(SCHEMA).unwrap();
        let summary = schema.summary.as_ref().unwrap();
        assert_eq!(summary.policy, SummaryPolicy::MaxOnly);
        assert_eq!(summary.required_keywords, vec!["3.89 GPA".to_string()]);

        let infosys = &schema.experience.as_ref().unwrap().companies["Infosys"];
        assert_eq!(infosys.exact_bullets, Some(4));
        assert_eq!(
            infosys.required_fields.get("role").map(String::as_str),
            Some("Senior Systems Engineer")
        );
    }

    #[test]
    fn test_project_defaults_fill_in() {
        let schema = ConstraintSchema::from_yaml(SCHEMA).unwrap();
        let projects = schema.projects.unwrap();
        assert_eq!(projects.required_fields.len(), 5);
        assert_eq!(projects.github_sentinel, "GitHub");
        assert_eq!(projects.github_url_prefixes, vec!["https://github.com/"]);
    }

    #[test]
    fn test_max_only_policy_drops_minimum() {
        let rules = SummaryRules {
            policy: SummaryPolicy::MaxOnly,
            min_chars: Some(450),
            max_chars: Some(520),
            ..SummaryRules::default()
        };
        assert_eq!(rules.effective_min_chars(), None);

        let rules = SummaryRules {
            policy: SummaryPolicy::Range,
            ..rules
        };
        assert_eq!(rules.effective_min_chars(), Some(450));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let schema = ConstraintSchema::load(&dir.path().join("constraints.yaml")).unwrap();
        assert_eq!(schema, ConstraintSchema::default());
        assert_eq!(schema.skills.unwrap().exact_categories, Some(7));
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constraints.yaml");
        std::fs::write(&path, "summary: 42").unwrap();
        assert!(matches!(
            ConstraintSchema::load(&path),
            Err(AppError::Config(_))
        ));
    }
}
