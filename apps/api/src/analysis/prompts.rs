// Prompt constants for resume analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, LIST_LIMIT_INSTRUCTION};

/// Role statement prepended to the JSON-only system fragment.
const ANALYSIS_ROLE: &str = "You are an expert resume reviewer and career coach. \
    You compare a resume against a job description and give concrete, honest feedback.";

/// Resume analysis prompt template.
/// Replace: {list_limit}, {resume_text}, {job_text}
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze how well the resume below fits the job description.

Return a JSON object with EXACTLY these seven fields (no extra fields):
{
  "summary": "Two or three sentences on overall fit.",
  "strengths": ["Strength relevant to the role"],
  "improvements": ["Concrete change to the resume"],
  "keywordMatch": 75,
  "skillGaps": ["Skill the job asks for that the resume lacks"],
  "recommendations": ["Actionable next step for the candidate"],
  "optimizedContent": "A rewritten professional summary tailored to this job."
}

Rules:
- keywordMatch is an integer from 0 to 100 estimating how many of the job's key terms the resume covers.
- {list_limit}
- Base every statement on the two documents. Do not invent experience.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_text}"#;

pub fn analysis_system_prompt() -> String {
    format!("{ANALYSIS_ROLE} {JSON_ONLY_SYSTEM}")
}

pub fn build_analysis_prompt(resume_text: &str, job_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{list_limit}", LIST_LIMIT_INSTRUCTION)
        .replace("{resume_text}", resume_text.trim())
        .replace("{job_text}", job_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_documents() {
        let prompt = build_analysis_prompt("  Rust engineer, 5 years  ", "Hiring Rust developer");
        assert!(prompt.contains("RESUME:\nRust engineer, 5 years"));
        assert!(prompt.contains("JOB DESCRIPTION:\nHiring Rust developer"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{list_limit}"));
    }

    #[test]
    fn test_prompt_names_all_result_fields() {
        let prompt = build_analysis_prompt("r", "j");
        for field in [
            "summary",
            "strengths",
            "improvements",
            "keywordMatch",
            "skillGaps",
            "recommendations",
            "optimizedContent",
        ] {
            assert!(prompt.contains(field), "missing field {field}");
        }
    }

    #[test]
    fn test_system_prompt_demands_json() {
        assert!(analysis_system_prompt().contains("valid JSON only"));
    }
}
