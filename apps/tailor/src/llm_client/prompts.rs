// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Horizontal rule used to separate prompt sections.
pub const SECTION_RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════════";

/// System prompt fragment that enforces YAML-only output.
pub const YAML_ONLY_SYSTEM: &str = "You are an expert resume writer producing structured \
    resume documents. You MUST respond with a single valid YAML document only. \
    Do NOT include any text before or after the YAML. \
    Do NOT include explanations or apologies.";

/// Grounding rule appended to every prompt that writes resume content.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Every fact must come from the CANDIDATE PROFILE. \
    Do NOT invent projects, employers, skills, technologies or metrics. \
    If the profile does not support a claim, leave it out.";

/// How emphasis and length limits interact.
pub const EMPHASIS_INSTRUCTION: &str = "\
    Bold spans are written as **text**. The ** markers do NOT count toward \
    character limits; each **...** pair counts as one bold marker.";

/// Formats one titled prompt section.
pub fn section(title: &str, body: &str) -> String {
    format!("{SECTION_RULE}\n{title}\n{SECTION_RULE}\n{body}\n")
}
