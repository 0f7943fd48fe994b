//! The structured resume document: the single artifact generated, validated,
//! revised and rendered by the pipeline.
//!
//! Every field is optional at the type level. A missing `summary` or a project
//! without `github` is something the validator reports on, not something the
//! parser rejects. Only YAML that is syntactically broken or has the wrong shape
//! (e.g. `summary` given as a list) fails to parse.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::strip_code_fences;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    /// Target company for this application. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    /// Free text with `**bold**` emphasis spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Priority-ranked: the first category is the most relevant to the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Pre-formatted contact line. May carry LaTeX and is rendered verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Header {
    /// Looks a header field up by its schema name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "title" => self.title.as_deref(),
            "contact" => self.contact.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Comma-separated skill list. Carries no emphasis markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

impl ExperienceEntry {
    /// Looks up a scalar field by name, for `required_fields` checks.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "company" => self.company.as_deref(),
            "role" => self.role.as_deref(),
            "location" => self.location.as_deref(),
            "duration" => self.duration.as_deref(),
            _ => None,
        }
    }
}

/// Literal placeholder accepted in place of a repository URL.
pub const GITHUB_SENTINEL: &str = "GitHub";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<String>,
    /// A repository URL or the literal `GitHub`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet2: Option<String>,
}

impl Project {
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "tech" => self.tech.as_deref(),
            "github" => self.github.as_deref(),
            "bullet1" => self.bullet1.as_deref(),
            "bullet2" => self.bullet2.as_deref(),
            _ => None,
        }
    }
}

impl ResumeDocument {
    /// Parses a YAML document, tolerating a surrounding markdown code fence.
    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        let body = strip_code_fences(text);
        if body.trim().is_empty() {
            return Err(AppError::MalformedDocument(
                "document is empty".to_string(),
            ));
        }
        let doc: ResumeDocument = serde_yaml::from_str(body)?;
        Ok(doc)
    }

    pub fn to_yaml(&self) -> Result<String, AppError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Finds the experience entry whose company name is `company` exactly,
    /// falling back to a substring match in either direction.
    ///
    /// The boolean is true when the match was exact.
    pub fn find_experience(&self, company: &str) -> Option<(&ExperienceEntry, bool)> {
        let entries = self.experience.as_deref()?;

        if let Some(exact) = entries
            .iter()
            .find(|e| e.company.as_deref() == Some(company))
        {
            return Some((exact, true));
        }

        entries
            .iter()
            .find(|e| match e.company.as_deref() {
                Some(name) if !name.is_empty() => {
                    name.contains(company) || company.contains(name)
                }
                _ => false,
            })
            .map(|e| (e, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
header:
  name: "Ada Lovelace"
  title: "Backend Engineer | Rust | Distributed Systems"
  contact: "ada@example.com"
summary: "Engineer with **5 years** of experience."
skills:
  - category: "Languages"
    items: "Rust, Python, Go"
experience:
  - company: "London Stock Exchange Group (LSEG)"
    role: "Senior Software Engineer"
    bullets:
      - "Built **event-driven** pipelines"
projects:
  - title: "Ledger"
    tech: "Rust, Postgres"
    github: "GitHub"
    bullet1: "Designed **append-only** storage"
"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = ResumeDocument::from_yaml(SAMPLE).unwrap();
        assert_eq!(
            doc.header.as_ref().and_then(|h| h.name.as_deref()),
            Some("Ada Lovelace")
        );
        assert_eq!(doc.skills.as_ref().map(Vec::len), Some(1));
        let project = &doc.projects.as_ref().unwrap()[0];
        assert_eq!(project.github.as_deref(), Some(GITHUB_SENTINEL));
        assert!(project.bullet2.is_none());
    }

    #[test]
    fn test_parse_fenced_document() {
        let fenced = format!("```yaml\n{SAMPLE}\n```");
        let doc = ResumeDocument::from_yaml(&fenced).unwrap();
        assert!(doc.summary.is_some());
    }

    #[test]
    fn test_missing_sections_parse_as_none() {
        let doc = ResumeDocument::from_yaml("summary: \"only a summary\"").unwrap();
        assert!(doc.header.is_none());
        assert!(doc.skills.is_none());
        assert!(doc.experience.is_none());
        assert!(doc.projects.is_none());
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let result = ResumeDocument::from_yaml("summary:\n  - a\n  - b\n");
        assert!(matches!(result, Err(AppError::MalformedDocument(_))));
    }

    #[test]
    fn test_empty_document_is_malformed() {
        assert!(matches!(
            ResumeDocument::from_yaml("   \n"),
            Err(AppError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip_preserves_document() {
        let doc = ResumeDocument::from_yaml(SAMPLE).unwrap();
        let again = ResumeDocument::from_yaml(&doc.to_yaml().unwrap()).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_find_experience_exact_then_substring() {
        let doc = ResumeDocument::from_yaml(SAMPLE).unwrap();

        let (_, exact) = doc
            .find_experience("London Stock Exchange Group (LSEG)")
            .unwrap();
        assert!(exact);

        let (entry, exact) = doc.find_experience("London Stock Exchange Group").unwrap();
        assert!(!exact);
        assert_eq!(entry.role.as_deref(), Some("Senior Software Engineer"));

        assert!(doc.find_experience("Infosys").is_none());
    }
}
