//! Text heuristics shared by the offline providers.
//!
//! Everything here is deterministic: the same documents always produce the
//! same terms, overlap and level label.

use std::collections::HashSet;

const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "you", "your", "our", "are", "will", "this", "that", "from",
    "have", "has", "who", "all", "can", "their", "they", "team", "work", "working", "years",
    "year", "experience", "about", "role", "into", "across", "within", "using", "must", "should",
    "would", "plus", "able", "etc", "new", "other", "strong", "good", "great", "seeking",
    "looking", "join", "including", "skills", "ability", "knowledge", "preferred", "required",
];

/// Seniority label used in the offline summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnicalLevel {
    Junior,
    MidLevel,
    Senior,
}

impl TechnicalLevel {
    pub fn label(self) -> &'static str {
        match self {
            TechnicalLevel::Junior => "Junior",
            TechnicalLevel::MidLevel => "Mid-level",
            TechnicalLevel::Senior => "Senior",
        }
    }
}

/// Reads the largest "N years" / "N+ years" claim in the resume. Without one,
/// falls back to a checksum of the text so the label is stable per resume.
pub fn technical_level(resume_text: &str) -> TechnicalLevel {
    match max_years_claimed(resume_text) {
        Some(years) if years >= 7 => TechnicalLevel::Senior,
        Some(years) if years >= 3 => TechnicalLevel::MidLevel,
        Some(_) => TechnicalLevel::Junior,
        None => {
            let checksum = resume_text
                .bytes()
                .fold(0u32, |acc, b| acc.wrapping_add(u32::from(b)));
            match checksum % 3 {
                0 => TechnicalLevel::Junior,
                1 => TechnicalLevel::MidLevel,
                _ => TechnicalLevel::Senior,
            }
        }
    }
}

fn max_years_claimed(text: &str) -> Option<u32> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();

    words
        .windows(2)
        .filter(|pair| pair[1].starts_with("year") || pair[1].starts_with("yr"))
        .filter_map(|pair| pair[0].trim_end_matches('+').parse::<u32>().ok())
        .filter(|years| *years <= 50)
        .max()
}

/// Salient lowercase terms in order of first appearance, without duplicates.
pub fn significant_terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| c.is_whitespace() || ",;:()[]{}\"'/|!?".contains(c))
        .map(|raw| {
            raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
                .to_lowercase()
        })
        .filter(|term| term.chars().count() >= 3)
        .filter(|term| term.chars().any(|c| c.is_alphabetic()))
        .filter(|term| !STOPWORDS.contains(&term.as_str()))
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Job-description terms split by whether the resume mentions them.
#[derive(Debug, Clone, Default)]
pub struct TermOverlap {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl TermOverlap {
    pub fn between(resume_text: &str, job_text: &str) -> Self {
        let resume_terms: HashSet<String> = significant_terms(resume_text).into_iter().collect();
        let (matched, missing): (Vec<String>, Vec<String>) = significant_terms(job_text)
            .into_iter()
            .partition(|term| resume_terms.contains(term));
        Self { matched, missing }
    }

    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    /// Share of job terms found in the resume, 0.0 – 1.0.
    pub fn ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.matched.len() as f64 / self.total() as f64
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lines carrying a number, e.g. "cut latency by 40%".
pub fn quantified_lines(text: &str) -> usize {
    text.lines()
        .filter(|line| line.chars().any(|c| c.is_ascii_digit()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_terms_dedups_and_drops_stopwords() {
        let terms = significant_terms("Seeking Node.js developer with Node.js, AWS and C++ skills.");
        assert_eq!(terms, vec!["node.js", "developer", "aws", "c++"]);
    }

    #[test]
    fn test_overlap_partitions_job_terms() {
        let overlap = TermOverlap::between(
            "Backend engineer: Rust, PostgreSQL, Docker",
            "Rust engineer with Kubernetes and Docker",
        );
        assert_eq!(overlap.matched, vec!["rust", "engineer", "docker"]);
        assert_eq!(overlap.missing, vec!["kubernetes"]);
        assert!((overlap.ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overlap_ratio_with_empty_job_is_zero() {
        assert_eq!(TermOverlap::between("anything", "").ratio(), 0.0);
    }

    #[test]
    fn test_technical_level_from_years() {
        assert_eq!(technical_level("10+ years building APIs"), TechnicalLevel::Senior);
        assert_eq!(technical_level("4 years of Python"), TechnicalLevel::MidLevel);
        assert_eq!(technical_level("1 year internship"), TechnicalLevel::Junior);
    }

    #[test]
    fn test_technical_level_is_stable_without_years() {
        let resume = "Experienced backend engineer";
        assert_eq!(technical_level(resume), technical_level(resume));
    }

    #[test]
    fn test_technical_level_handles_huge_input() {
        // Byte sum well past u32::MAX.
        let resume = "\u{FFFF}".repeat(6_500_000);
        assert_eq!(technical_level(&resume), technical_level(&resume));
    }

    #[test]
    fn test_quantified_lines_counts_numeric_lines() {
        assert_eq!(quantified_lines("cut cost 30%\nled team\nshipped 4 apps"), 2);
    }
}
