//! Schema-driven constraint checks.
//!
//! Sections are checked in a fixed order (header, summary, skills, experience,
//! projects) and within a section in document order, so identical inputs give
//! identical reports. A section whose rules are absent from the schema is
//! skipped entirely.

use crate::constraints::{
    CompanyRules, ConstraintSchema, HeaderRules, ProjectsRules, SkillsRules, SummaryRules,
    PROJECT_BULLET_FIELDS,
};
use crate::models::{Project, ResumeDocument};

use super::emphasis::measure;
use super::report::{Unit, ValidationReport, Violation};

pub fn validate(doc: &ResumeDocument, schema: &ConstraintSchema) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(rules) = &schema.header {
        check_header(doc, rules, &mut report);
    }
    if let Some(rules) = &schema.summary {
        check_summary(doc, rules, &mut report);
    }
    if let Some(rules) = &schema.skills {
        check_skills(doc, rules, &mut report);
    }
    if let Some(rules) = &schema.experience {
        for (company, company_rules) in &rules.companies {
            check_company(doc, company, company_rules, &mut report);
        }
    }
    if let Some(rules) = &schema.projects {
        check_projects(doc, rules, &mut report);
    }

    report
}

// ────────────────────────────────────────────────────────────────────────────
// Shared measurements
// ────────────────────────────────────────────────────────────────────────────

struct Check<'a> {
    location: &'a str,
    id: String,
    metric: &'a str,
    unit: Unit,
}

/// Inclusive range check. Records nothing when neither bound is set.
fn check_range(
    report: &mut ValidationReport,
    check: Check<'_>,
    measured: usize,
    min: Option<usize>,
    max: Option<usize>,
) {
    if min.is_none() && max.is_none() {
        return;
    }
    let low_ok = min.map_or(true, |m| measured >= m);
    let high_ok = max.map_or(true, |m| measured <= m);
    if low_ok && high_ok {
        report.pass(check.id);
    } else {
        report.fail(
            check.location,
            Violation::OutOfRange {
                metric: check.metric.to_string(),
                unit: check.unit,
                measured,
                min,
                max,
            },
        );
    }
}

fn check_exact(
    report: &mut ValidationReport,
    check: Check<'_>,
    measured: usize,
    expected: Option<usize>,
) {
    let Some(expected) = expected else {
        return;
    };
    if measured == expected {
        report.pass(check.id);
    } else {
        report.fail(
            check.location,
            Violation::CountMismatch {
                metric: check.metric.to_string(),
                unit: check.unit,
                measured,
                expected,
            },
        );
    }
}

fn missing_field(report: &mut ValidationReport, location: &str, field: &str) {
    report.fail(
        location,
        Violation::MissingField {
            field: field.to_string(),
        },
    );
}

/// Length (markers excluded) and bold-unit checks for one emphasis-marked text.
/// Both are evaluated; neither suppresses the other.
fn check_marked_text(
    report: &mut ValidationReport,
    location: &str,
    id: &str,
    text: &str,
    chars: (Option<usize>, Option<usize>),
    bold: (Option<usize>, Option<usize>),
) {
    let m = measure(text);
    check_range(
        report,
        Check {
            location,
            id: format!("{id}.length"),
            metric: "length",
            unit: Unit::Characters,
        },
        m.chars,
        chars.0,
        chars.1,
    );
    check_range(
        report,
        Check {
            location,
            id: format!("{id}.bold"),
            metric: "bold markers",
            unit: Unit::BoldMarkers,
        },
        m.bold_units,
        bold.0,
        bold.1,
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn check_header(doc: &ResumeDocument, rules: &HeaderRules, report: &mut ValidationReport) {
    let Some(header) = &doc.header else {
        if !rules.required_fields.is_empty() || !rules.exact_values.is_empty() {
            report.fail("header", Violation::MissingSection);
        }
        return;
    };

    let mut missing = Vec::new();
    for field in &rules.required_fields {
        if header.field(field).is_some() {
            report.pass(format!("header.{field}"));
        } else {
            missing_field(report, "header", field);
            missing.push(field.as_str());
        }
    }

    for (field, expected) in &rules.exact_values {
        // Already reported as missing; one error per absent field.
        if missing.contains(&field.as_str()) {
            continue;
        }
        let actual = header.field(field);
        if actual == Some(expected.as_str()) {
            report.pass(format!("header.{field}.value"));
        } else {
            report.fail(
                "header",
                Violation::ValueMismatch {
                    field: field.clone(),
                    expected: expected.clone(),
                    actual: actual.map(str::to_string),
                },
            );
        }
    }
}

fn check_summary(doc: &ResumeDocument, rules: &SummaryRules, report: &mut ValidationReport) {
    let Some(summary) = doc.summary.as_deref() else {
        report.fail("summary", Violation::MissingSection);
        return;
    };
    let summary = summary.trim();

    check_marked_text(
        report,
        "summary",
        "summary",
        summary,
        (rules.effective_min_chars(), rules.max_chars),
        (rules.min_bold, rules.max_bold),
    );

    // Raw substring match, markers included.
    for keyword in &rules.required_keywords {
        if summary.contains(keyword.as_str()) {
            report.pass(format!("summary.keyword[{keyword}]"));
        } else {
            report.fail(
                "summary",
                Violation::MissingKeyword {
                    keyword: keyword.clone(),
                },
            );
        }
    }
}

fn check_skills(doc: &ResumeDocument, rules: &SkillsRules, report: &mut ValidationReport) {
    let Some(skills) = &doc.skills else {
        report.fail("skills", Violation::MissingSection);
        return;
    };

    check_exact(
        report,
        Check {
            location: "skills",
            id: "skills.count".to_string(),
            metric: "category count",
            unit: Unit::Categories,
        },
        skills.len(),
        rules.exact_categories,
    );

    let items_min = rules.items_min_chars.filter(|&m| m > 0);

    for (i, skill) in skills.iter().enumerate() {
        let n = i + 1;
        let location = match skill.category.as_deref() {
            Some(name) => format!("skills[{n}] ({name})"),
            None => format!("skills[{n}]"),
        };

        match skill.category.as_deref() {
            Some(name) => check_range(
                report,
                Check {
                    location: &location,
                    id: format!("skills[{n}].category"),
                    metric: "category name length",
                    unit: Unit::Characters,
                },
                name.chars().count(),
                None,
                rules.category_name_max_chars,
            ),
            None => missing_field(report, &location, "category"),
        }

        match skill.items.as_deref() {
            Some(items) => check_range(
                report,
                Check {
                    location: &location,
                    id: format!("skills[{n}].items"),
                    metric: "items length",
                    unit: Unit::Characters,
                },
                items.chars().count(),
                items_min,
                rules.items_max_chars,
            ),
            None => missing_field(report, &location, "items"),
        }
    }
}

fn check_company(
    doc: &ResumeDocument,
    company: &str,
    rules: &CompanyRules,
    report: &mut ValidationReport,
) {
    let location = format!("experience[{company}]");

    if doc.experience.is_none() {
        report.fail(&location, Violation::MissingSection);
        return;
    }
    let Some((entry, exact)) = doc.find_experience(company) else {
        report.fail(&location, Violation::MissingEntry);
        return;
    };
    if !exact {
        report.warn(format!(
            "{location}: matched entry '{}' by partial company name",
            entry.company.as_deref().unwrap_or_default()
        ));
    }

    for (field, expected) in &rules.required_fields {
        let actual = entry.field(field);
        if actual == Some(expected.as_str()) {
            report.pass(format!("{location}.{field}"));
        } else {
            report.fail(
                &location,
                Violation::ValueMismatch {
                    field: field.clone(),
                    expected: expected.clone(),
                    actual: actual.map(str::to_string),
                },
            );
        }
    }

    let Some(bullets) = &entry.bullets else {
        missing_field(report, &location, "bullets");
        return;
    };

    check_exact(
        report,
        Check {
            location: &location,
            id: format!("{location}.bullet_count"),
            metric: "bullet count",
            unit: Unit::Bullets,
        },
        bullets.len(),
        rules.exact_bullets,
    );

    for (i, bullet) in bullets.iter().enumerate() {
        let bullet_location = format!("{location} bullet {}", i + 1);
        check_marked_text(
            report,
            &bullet_location,
            &format!("{location}.bullet[{}]", i + 1),
            bullet,
            (rules.bullet_min_chars, rules.bullet_max_chars),
            (rules.bullet_min_bold, rules.bullet_max_bold),
        );
    }
}

fn check_projects(doc: &ResumeDocument, rules: &ProjectsRules, report: &mut ValidationReport) {
    let Some(projects) = &doc.projects else {
        report.fail("projects", Violation::MissingSection);
        return;
    };

    check_exact(
        report,
        Check {
            location: "projects",
            id: "projects.count".to_string(),
            metric: "project count",
            unit: Unit::Projects,
        },
        projects.len(),
        rules.exact_count,
    );

    for (i, project) in projects.iter().enumerate() {
        check_project(i + 1, project, rules, report);
    }
}

fn check_project(n: usize, project: &Project, rules: &ProjectsRules, report: &mut ValidationReport) {
    let location = match project.title.as_deref() {
        Some(title) => format!("projects[{n}] ({title})"),
        None => format!("projects[{n}]"),
    };
    let id = format!("projects[{n}]");

    // Every required field is checked; one absence does not hide another.
    for field in &rules.required_fields {
        if project.field(field).is_some() {
            report.pass(format!("{id}.{field}"));
        } else {
            missing_field(report, &location, field);
        }
    }

    if let Some(tech) = project.tech.as_deref() {
        check_range(
            report,
            Check {
                location: &location,
                id: format!("{id}.tech"),
                metric: "tech length",
                unit: Unit::Characters,
            },
            tech.chars().count(),
            None,
            rules.tech_max_chars,
        );
    }

    if let Some(github) = project.github.as_deref() {
        let recognised = github == rules.github_sentinel
            || rules
                .github_url_prefixes
                .iter()
                .any(|prefix| github.starts_with(prefix.as_str()));
        if !recognised {
            report.warn(format!(
                "{location}: github '{github}' is neither '{}' nor a recognised repository URL",
                rules.github_sentinel
            ));
        }
    }

    for field in PROJECT_BULLET_FIELDS {
        let Some(text) = project.field(field) else {
            continue;
        };
        let m = measure(text);
        check_range(
            report,
            Check {
                location: &location,
                id: format!("{id}.{field}.length"),
                metric: &format!("{field} length"),
                unit: Unit::Characters,
            },
            m.chars,
            rules.bullet_min_chars,
            rules.bullet_max_chars,
        );
        check_range(
            report,
            Check {
                location: &location,
                id: format!("{id}.{field}.bold"),
                metric: &format!("{field} bold markers"),
                unit: Unit::BoldMarkers,
            },
            m.bold_units,
            rules.bullet_min_bold,
            rules.bullet_max_bold,
        );
    }
}
