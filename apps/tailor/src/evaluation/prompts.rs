// Prompt constants for the quality and ATS reviewers.

pub const QUALITY_SYSTEM: &str = "You are an expert resume reviewer. You evaluate \
    content quality strictly and follow the requested response format exactly.";

/// Quality review prompt. Replace: {jd_section}, {profile_section}, {resume_section}
pub const QUALITY_PROMPT_TEMPLATE: &str = r#"Evaluate the CONTENT quality of the resume below: writing quality, job relevance and impact.

{jd_section}
{profile_section}
{resume_section}
RULES:
- ONLY suggest skills, projects or technologies that appear in the CANDIDATE PROFILE.
- Point out profile items that are missing from the resume but matter for this job.
- Prefer reframing what is already there over adding new material.

Format your response EXACTLY as follows:

SUMMARY: [score]/10
[2-3 sentences: clarity, relevance, metrics]

SKILLS: [score]/10
[2-3 sentences: coverage and ordering against the job]

WORK EXPERIENCE: [score]/10
[2-3 sentences: bullet quality, verbs, quantified results]

PROJECTS: [score]/10
[2-3 sentences: relevance and technical depth]

CRITICAL ISSUES:
- [problems that MUST be fixed, or "None"]

TOP 3 IMPROVEMENTS:
1. [specific, actionable improvement]
2. [specific improvement]
3. [specific improvement]

OVERALL CONTENT SCORE: [average]/10"#;

pub const ATS_SYSTEM: &str = "You are an applicant tracking system analyst. You score \
    resumes for keyword coverage and parseability and follow the requested format exactly.";

/// ATS review prompt. Replace: {jd_section}, {profile_section}, {resume_section}
pub const ATS_PROMPT_TEMPLATE: &str = r#"Analyze the resume below for ATS compatibility and keyword matching against the job description.

{jd_section}
{profile_section}
{resume_section}
When suggesting missing keywords, ONLY suggest items that appear in the CANDIDATE PROFILE.

Response format:

TEXT EXTRACTION (/10): [X]/10
KEYWORD MATCHING (/30):
- Found: [list]
- Missing: [list]
- Score: [X]/30
SKILLS COVERAGE (/25): [X]/25
EXPERIENCE ALIGNMENT (/20): [X]/20
PROJECT RELEVANCE (/10): [X]/10
HARD REQUIREMENTS (/5): [X]/5

TOTAL SCORE: [X]/100
VERDICT: [PASS 85+ | BORDERLINE 70-84 | FAIL <70]

TOP 3 FIXES:
1. [specific improvement]
2. [specific improvement]
3. [specific improvement]"#;
