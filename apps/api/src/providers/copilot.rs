//! Offline keyword-overlap analyzer registered as `copilot`.
//!
//! Scores the share of salient job-description terms that also appear in the
//! resume. No network, always available.

use async_trait::async_trait;

use crate::analysis::AnalysisResult;
use crate::errors::AppError;
use crate::providers::heuristics::{quantified_lines, technical_level, word_count, TermOverlap};
use crate::providers::AnalyzerProvider;

const SHORT_RESUME_WORDS: usize = 150;

pub struct CopilotProvider;

impl CopilotProvider {
    pub const ID: &'static str = "copilot";
}

#[async_trait]
impl AnalyzerProvider for CopilotProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "GitHub Copilot"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<AnalysisResult, AppError> {
        Ok(keyword_analysis(resume_text, job_text))
    }
}

fn keyword_analysis(resume_text: &str, job_text: &str) -> AnalysisResult {
    let overlap = TermOverlap::between(resume_text, job_text);
    let level = technical_level(resume_text).label();
    let score = (overlap.ratio() * 100.0).round() as u32;

    let strengths = overlap
        .matched
        .iter()
        .map(|term| format!("Demonstrated experience with {term}"))
        .collect();

    let mut improvements = Vec::new();
    if quantified_lines(resume_text) == 0 {
        improvements.push("Quantify achievements with concrete metrics".to_string());
    }
    if word_count(resume_text) < SHORT_RESUME_WORDS {
        improvements.push("Expand on responsibilities and outcomes for recent roles".to_string());
    }
    if !overlap.missing.is_empty() {
        improvements.push(format!(
            "Work the job's key terms into your experience bullets (e.g. {})",
            top(&overlap.missing, 3)
        ));
    }
    improvements.push("Tailor the professional summary to the target role".to_string());

    let mut recommendations: Vec<String> = overlap
        .missing
        .iter()
        .take(3)
        .map(|term| format!("Add concrete examples of {term} if you have used it"))
        .collect();
    recommendations.push(
        "Mirror the job description's terminology in your skills section".to_string(),
    );

    let optimized_content = (!overlap.matched.is_empty()).then(|| {
        format!(
            "{level} professional with hands-on experience in {}.",
            top(&overlap.matched, 5)
        )
    });

    AnalysisResult {
        summary: format!(
            "{level} candidate with a {score}% keyword match: {} of {} key job terms appear in the resume.",
            overlap.matched.len(),
            overlap.total()
        ),
        strengths,
        improvements,
        keyword_match: score,
        skill_gaps: overlap.missing.clone(),
        recommendations,
        optimized_content,
    }
    .normalized()
}

fn top(terms: &[String], n: usize) -> String {
    terms.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}
