//! LaTeX rendering of a `ResumeDocument`.
//!
//! Templates carry `<<placeholder>>` markers; each is replaced by a rendered
//! section. Text fields are escaped and `**span**` becomes `\textbf{span}`.
//! The header contact line is inserted verbatim because it already carries
//! LaTeX (links, separators).

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;
use crate::models::resume::{ExperienceEntry, Project, SkillCategory, GITHUB_SENTINEL};
use crate::models::ResumeDocument;

/// `**span**` with no asterisks inside the span.
fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*([^*]+?)\*\*").expect("bold pattern is valid"))
}

fn placeholder_pattern() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"<<([a-z_]+)>>").expect("placeholder pattern is valid"))
}

/// Escapes LaTeX special characters. Backslashes are left untouched.
fn escape_plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\^{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes `text` and converts emphasis spans to `\textbf{}`.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for caps in bold_pattern().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&escape_plain(&text[last..whole.start()]));
        out.push_str(r"\textbf{");
        out.push_str(&escape_plain(inner.as_str()));
        out.push('}');
        last = whole.end();
    }
    out.push_str(&escape_plain(&text[last..]));
    out
}

fn escape_opt(text: Option<&str>) -> String {
    text.map(escape_latex).unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn render_skills(skills: &[SkillCategory]) -> String {
    skills
        .iter()
        .map(|s| {
            format!(
                "  \\item \\textbf{{{}}}{{: {}}}",
                escape_opt(s.category.as_deref()),
                escape_opt(s.items.as_deref())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_experience(entries: &[ExperienceEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "\\resumeSubheading{{{}}}{{{}}}{{{}}}{{{}}}\n",
            escape_opt(entry.company.as_deref()),
            escape_opt(entry.duration.as_deref()),
            escape_opt(entry.role.as_deref()),
            escape_opt(entry.location.as_deref()),
        ));
        out.push_str("\\resumeItemListStart\n");
        for bullet in entry.bullets.iter().flatten() {
            out.push_str(&format!("  \\resumeItem{{{}}}\n", escape_latex(bullet)));
        }
        out.push_str("\\resumeItemListEnd\n");
    }
    out
}

/// A repository URL becomes a link labelled `GitHub`; the sentinel renders as
/// plain text.
fn render_github(github: Option<&str>) -> String {
    match github {
        Some(url) if url != GITHUB_SENTINEL && !url.is_empty() => {
            format!("\\href{{{}}}{{{GITHUB_SENTINEL}}}", escape_url(url))
        }
        Some(_) => GITHUB_SENTINEL.to_string(),
        None => String::new(),
    }
}

/// `\href` takes the target mostly verbatim, but `#` and `%` still break it
/// when the link sits inside another command's argument.
fn escape_url(url: &str) -> String {
    url.replace('%', "\\%").replace('#', "\\#")
}

fn render_projects(projects: &[Project]) -> String {
    let mut out = String::new();
    for project in projects {
        out.push_str(&format!(
            "\\resumeProjectHeading{{\\textbf{{{}}} $|$ \\emph{{{}}}}}{{{}}}\n",
            escape_opt(project.title.as_deref()),
            escape_opt(project.tech.as_deref()),
            render_github(project.github.as_deref()),
        ));
        out.push_str("\\resumeItemListStart\n");
        for bullet in [&project.bullet1, &project.bullet2].into_iter().flatten() {
            out.push_str(&format!("  \\resumeItem{{{}}}\n", escape_latex(bullet)));
        }
        out.push_str("\\resumeItemListEnd\n");
    }
    out
}

/// Value for one placeholder, or `None` when the name is unknown.
fn placeholder_value(name: &str, doc: &ResumeDocument) -> Option<String> {
    let header = doc.header.as_ref();
    let value = match name {
        "company" => escape_opt(doc.company_name.as_deref()),
        "name" => escape_opt(header.and_then(|h| h.name.as_deref())),
        "title" => escape_opt(header.and_then(|h| h.title.as_deref())),
        "contact" => header
            .and_then(|h| h.contact.clone())
            .unwrap_or_default(),
        "summary" => escape_opt(doc.summary.as_deref().map(str::trim)),
        "skills" => render_skills(doc.skills.as_deref().unwrap_or_default()),
        "experience" => render_experience(doc.experience.as_deref().unwrap_or_default()),
        "projects" => render_projects(doc.projects.as_deref().unwrap_or_default()),
        _ => return None,
    };
    Some(value)
}

/// Replaces every `<<placeholder>>` in `template`. An unknown placeholder is a
/// render error: the template and the document model disagree.
pub fn fill_template(template: &str, doc: &ResumeDocument) -> Result<String, AppError> {
    let mut out = String::with_capacity(template.len() * 2);
    let mut last = 0;
    for caps in placeholder_pattern().captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = placeholder_value(name.as_str(), doc).ok_or_else(|| {
            AppError::Render(format!("template uses unknown placeholder <<{}>>", name.as_str()))
        })?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}
