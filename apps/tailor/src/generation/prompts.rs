// All LLM prompt constants for the generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Resume generation prompt template.
/// Replace: {jd_section}, {constraints_section}, {profile_section},
///          {factual_instruction}, {emphasis_instruction}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Generate a complete resume document tailored to the job description below.

{jd_section}
{constraints_section}
{profile_section}
GENERATION STEPS:
1. Analyze the job description: role type, the 15-20 most important keywords, focus areas.
2. header: name and contact exactly as in the profile; title = target role plus the top 3-5 JD keywords (max 100 characters).
3. summary: a dense paragraph tying the candidate's experience to this role, meeting the summary limits.
4. skills: order categories by relevance to the JD, most relevant first. Use only skills from the profile.
5. experience: one entry per employer in the constraints, with exactly the required number of bullets. Use real metrics from the profile.
6. projects: pick the projects from the profile that best match the JD's stack. Each has title, tech, github, bullet1, bullet2. Use the literal "GitHub" when no repository URL is known.

{factual_instruction}

{emphasis_instruction}

EVERY limit in the CONSTRAINTS section is a hard limit (character counts, bold counts, exact counts).

OUTPUT FORMAT (YAML, no commentary):
header:
  name: "..."
  title: "..."
  contact: "..."
summary: "..."
skills:
  - category: "..."
    items: "..."
experience:
  - company: "..."
    role: "..."
    location: "..."
    duration: "..."
    bullets:
      - "..."
projects:
  - title: "..."
    tech: "..."
    github: "GitHub"
    bullet1: "..."
    bullet2: "..."
"#;

/// Revision prompt template.
/// Replace: {document_section}, {feedback_section}, {jd_section},
///          {constraints_section}, {profile_section},
///          {factual_instruction}, {emphasis_instruction}
pub const REVISION_PROMPT_TEMPLATE: &str = r#"Revise the resume document below so that it addresses the feedback while meeting every constraint.

{document_section}
{feedback_section}
{jd_section}
{constraints_section}
{profile_section}
REVISION RULES:
1. Change only what the feedback asks for; keep every other field as it is.
2. Where the feedback says "add N characters" or "remove N characters", adjust that field by that amount.
3. Where it says "add N bold markers" or "remove N bold markers", adjust the **...** spans in that field.
4. Keep exactly the same structure: same sections, same employers, same number of projects unless the feedback says otherwise.

{factual_instruction}

{emphasis_instruction}

Output the COMPLETE revised document as YAML, starting with "header:". No commentary."#;

/// Company-name extraction prompt. Replace `{jd_excerpt}`.
pub const COMPANY_PROMPT_TEMPLATE: &str = r#"Extract ONLY the hiring company's name from this job description.

Job description:
{jd_excerpt}

Instructions:
- Return ONLY the company name (e.g. "Google", "Stripe").
- Do NOT include suffixes such as Inc, LLC or Corporation.
- Do NOT include any other text.
- If several companies are mentioned, return the one that is hiring.

Company name:"#;

pub const COMPANY_SYSTEM: &str = "You extract company names from job postings. \
    Reply with the name only.";
