use serde::{Deserialize, Serialize};

/// Upper bound for every list field in an analysis.
pub const MAX_LIST_ITEMS: usize = 5;
pub const MAX_KEYWORD_MATCH: u32 = 100;

/// Placeholder used when a provider produced no usable summary.
pub const DEFAULT_SUMMARY: &str = "Analysis completed.";

/// Canonical structured output of every analyzer provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// 0 – 100 heuristic alignment between resume and job description.
    pub keyword_match: u32,
    pub skill_gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub optimized_content: Option<String>,
}

impl AnalysisResult {
    /// Enforces the output invariants: lists capped at five entries,
    /// `keyword_match` within 0..=100 and a non-empty summary.
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.strengths,
            &mut self.improvements,
            &mut self.skill_gaps,
            &mut self.recommendations,
        ] {
            list.truncate(MAX_LIST_ITEMS);
        }
        self.keyword_match = self.keyword_match.min(MAX_KEYWORD_MATCH);
        if self.summary.trim().is_empty() {
            self.summary = DEFAULT_SUMMARY.to_string();
        }
        self
    }

    /// True when the value already satisfies the invariants `normalized` enforces.
    #[cfg(test)]
    pub fn is_well_formed(&self) -> bool {
        [
            &self.strengths,
            &self.improvements,
            &self.skill_gaps,
            &self.recommendations,
        ]
        .iter()
        .all(|list| list.len() <= MAX_LIST_ITEMS)
            && self.keyword_match <= MAX_KEYWORD_MATCH
            && !self.summary.trim().is_empty()
    }
}

/// Clamps a raw, possibly fractional or negative score into 0..=100.
pub fn clamp_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, MAX_KEYWORD_MATCH as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("item {i}")).collect()
    }

    #[test]
    fn test_normalized_truncates_every_list() {
        let result = AnalysisResult {
            summary: "ok".into(),
            strengths: items(8),
            improvements: items(6),
            keyword_match: 40,
            skill_gaps: items(5),
            recommendations: items(12),
            optimized_content: None,
        }
        .normalized();

        assert_eq!(result.strengths, items(5));
        assert_eq!(result.improvements.len(), 5);
        assert_eq!(result.skill_gaps.len(), 5);
        assert_eq!(result.recommendations.len(), 5);
        assert!(result.is_well_formed());
    }

    #[test]
    fn test_normalized_clamps_score_and_fills_summary() {
        let result = AnalysisResult {
            summary: "   ".into(),
            keyword_match: 250,
            ..Default::default()
        }
        .normalized();

        assert_eq!(result.keyword_match, 100);
        assert_eq!(result.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(-20.0), 0);
        assert_eq!(clamp_score(150.0), 100);
        assert_eq!(clamp_score(72.6), 73);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(AnalysisResult::default().normalized()).unwrap();
        assert!(json.get("keywordMatch").is_some());
        assert!(json.get("skillGaps").is_some());
        assert!(json.get("optimizedContent").is_some());
    }
}
