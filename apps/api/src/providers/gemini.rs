//! Offline structure analyzer registered as `gemini`.
//!
//! Looks at how the resume is organised (standard sections, quantified
//! achievements, length) and blends that with job-term overlap.

use async_trait::async_trait;

use crate::analysis::result::clamp_score;
use crate::analysis::AnalysisResult;
use crate::errors::AppError;
use crate::providers::heuristics::{
    quantified_lines, technical_level, word_count, TechnicalLevel, TermOverlap,
};
use crate::providers::AnalyzerProvider;

const CORE_SECTIONS: &[&str] = &["experience", "education", "skills", "projects"];
const QUANTIFIED_TARGET: usize = 5;
const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 900;

// Score weights, summing to 1.0.
const OVERLAP_WEIGHT: f64 = 0.4;
const SECTION_WEIGHT: f64 = 0.3;
const QUANTIFIED_WEIGHT: f64 = 0.3;

pub struct GeminiProvider;

impl GeminiProvider {
    pub const ID: &'static str = "gemini";
}

#[async_trait]
impl AnalyzerProvider for GeminiProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "Google Gemini"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<AnalysisResult, AppError> {
        Ok(structure_analysis(resume_text, job_text))
    }
}

fn structure_analysis(resume_text: &str, job_text: &str) -> AnalysisResult {
    let lower = resume_text.to_lowercase();
    let (present, absent): (Vec<&str>, Vec<&str>) =
        CORE_SECTIONS.iter().copied().partition(|section| lower.contains(*section));
    let quantified = quantified_lines(resume_text);
    let words = word_count(resume_text);
    let overlap = TermOverlap::between(resume_text, job_text);
    let level = technical_level(resume_text);

    let section_ratio = present.len() as f64 / CORE_SECTIONS.len() as f64;
    let quantified_ratio = quantified.min(QUANTIFIED_TARGET) as f64 / QUANTIFIED_TARGET as f64;
    let score = clamp_score(
        100.0
            * (OVERLAP_WEIGHT * overlap.ratio()
                + SECTION_WEIGHT * section_ratio
                + QUANTIFIED_WEIGHT * quantified_ratio),
    );

    let mut strengths: Vec<String> = present
        .iter()
        .map(|section| format!("Clear {section} section"))
        .collect();
    if quantified > 0 {
        strengths.insert(0, format!("Includes {quantified} quantified achievement lines"));
    }

    let mut improvements: Vec<String> = absent
        .iter()
        .map(|section| format!("Add a dedicated {section} section"))
        .collect();
    if quantified == 0 {
        improvements.push("Back up accomplishments with numbers, percentages or time saved".to_string());
    }
    if words < MIN_WORDS {
        improvements.push("Add more detail on scope and outcomes of each role".to_string());
    } else if words > MAX_WORDS {
        improvements.push("Trim the resume so it fits on two pages".to_string());
    }

    let recommendations = match level {
        TechnicalLevel::Junior => vec![
            "Lead with projects and coursework that match the job".to_string(),
            "List tools you have used hands-on in a skills section".to_string(),
        ],
        TechnicalLevel::MidLevel => vec![
            "Highlight ownership of features from design to release".to_string(),
            "Show growth in responsibility across roles".to_string(),
        ],
        TechnicalLevel::Senior => vec![
            "Emphasise technical leadership and mentoring".to_string(),
            "Describe architecture decisions and their business impact".to_string(),
        ],
    };

    AnalysisResult {
        summary: format!(
            "{} resume covering {} of {} standard sections with {} quantified lines and a {}% overall match.",
            level.label(),
            present.len(),
            CORE_SECTIONS.len(),
            quantified,
            score
        ),
        strengths,
        improvements,
        keyword_match: score,
        skill_gaps: overlap.missing,
        recommendations,
        optimized_content: None,
    }
    .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED_RESUME: &str = "SUMMARY\nSenior engineer, 9 years.\n\
        EXPERIENCE\nAcme: cut infra cost 35%\nGlobex: shipped 12 releases\n\
        EDUCATION\nBSc Computer Science\n\
        SKILLS\nRust, Go, Kubernetes\n\
        PROJECTS\nOpen source CLI with 2000 stars";

    #[tokio::test]
    async fn test_recognises_sections_and_metrics() {
        let result = GeminiProvider
            .analyze(STRUCTURED_RESUME, "Rust engineer familiar with Kubernetes")
            .await
            .unwrap();

        assert!(result.strengths[0].starts_with("Includes"));
        assert!(result.strengths.contains(&"Clear education section".to_string()));
        assert!(!result
            .improvements
            .iter()
            .any(|i| i.starts_with("Add a dedicated")));
        assert!(result.summary.starts_with("Senior"));
    }

    #[tokio::test]
    async fn test_unstructured_resume_gets_section_advice() {
        let result = GeminiProvider
            .analyze("I like computers", "Python developer")
            .await
            .unwrap();

        assert!(result
            .improvements
            .contains(&"Add a dedicated experience section".to_string()));
        assert!(result.skill_gaps.contains(&"python".to_string()));
        assert!(result.is_well_formed());
    }

    #[tokio::test]
    async fn test_score_stays_in_range() {
        let result = GeminiProvider
            .analyze(STRUCTURED_RESUME, STRUCTURED_RESUME)
            .await
            .unwrap();
        assert!(result.keyword_match <= 100);
        assert!(result.keyword_match >= 90);
    }
}
