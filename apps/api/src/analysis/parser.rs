//! Result Parser: turns a model's raw text reply into an `AnalysisResult`.
//!
//! Two tiers:
//! 1. Structured: the outermost `{...}` region is decoded as JSON and each
//!    field is read defensively.
//! 2. Fallback: when there is no decodable object, the reply is treated as
//!    prose and the fields are recovered heuristically.
//!
//! Parsing never fails. Both tiers return a normalized result.

use serde_json::Value;
use tracing::warn;

use crate::analysis::result::{clamp_score, AnalysisResult, MAX_LIST_ITEMS};

pub const FALLBACK_SUMMARY: &str = "Analysis completed. The response could not be fully \
    structured, so some results may need manual review.";

const OPTIMIZED_PREVIEW_CHARS: usize = 500;
const BASELINE_SCORE: i64 = 50;
const SENTIMENT_STEP: i64 = 10;
const POSITIVE_WORDS: &[&str] = &["strong", "excellent", "impressive", "well-suited"];
const NEGATIVE_WORDS: &[&str] = &["weak", "missing", "lacking", "insufficient"];

/// Which tier produced a result. Callers that only need the value use `into_result`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(AnalysisResult),
    Fallback(AnalysisResult),
}

impl ParseOutcome {
    pub fn into_result(self) -> AnalysisResult {
        match self {
            ParseOutcome::Parsed(result) | ParseOutcome::Fallback(result) => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseOutcome::Fallback(_))
    }
}

pub fn parse_analysis_response(raw: &str) -> ParseOutcome {
    let decoded = extract_json_object(raw)
        .and_then(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .filter(Value::is_object);

    match decoded {
        Some(value) => ParseOutcome::Parsed(from_json(&value).normalized()),
        None => {
            warn!(
                response_len = raw.len(),
                "Model response is not structured JSON, using heuristic extraction"
            );
            ParseOutcome::Fallback(from_prose(raw).normalized())
        }
    }
}

/// Greedy outer-brace match: first `{` through last `}`.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

// ────────────────────────────────────────────────────────────────────────────
// Structured tier
// ────────────────────────────────────────────────────────────────────────────

fn from_json(value: &Value) -> AnalysisResult {
    AnalysisResult {
        summary: string_field(value, "summary").unwrap_or_default(),
        strengths: string_list(value, "strengths"),
        improvements: string_list(value, "improvements"),
        keyword_match: score_field(value, "keywordMatch"),
        skill_gaps: string_list(value, "skillGaps"),
        recommendations: string_list(value, "recommendations"),
        optimized_content: string_field(value, "optimizedContent"),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Numbers are clamped; numeric strings such as `"85"` or `"85%"` are accepted.
fn score_field(value: &Value, key: &str) -> u32 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().map(clamp_score).unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(clamp_score)
            .unwrap_or(0),
        _ => 0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback tier
// ────────────────────────────────────────────────────────────────────────────

fn from_prose(raw: &str) -> AnalysisResult {
    let lines: Vec<&str> = raw.lines().collect();

    AnalysisResult {
        summary: FALLBACK_SUMMARY.to_string(),
        strengths: extract_section(&lines, "strength"),
        improvements: extract_section(&lines, "improv"),
        keyword_match: estimate_keyword_match(raw),
        skill_gaps: extract_section(&lines, "skill"),
        recommendations: extract_section(&lines, "recommend"),
        optimized_content: Some(preview(raw)),
    }
}

/// Collects list items following the first line that mentions `keyword`.
/// Stops at the first blank line or at the item cap.
fn extract_section(lines: &[&str], keyword: &str) -> Vec<String> {
    let Some(heading) = lines
        .iter()
        .position(|line| line.to_lowercase().contains(keyword))
    else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for line in &lines[heading + 1..] {
        if line.trim().is_empty() {
            break;
        }
        if let Some(item) = strip_list_marker(line) {
            if !item.is_empty() {
                items.push(item.to_string());
            }
            if items.len() == MAX_LIST_ITEMS {
                break;
            }
        }
    }
    items
}

/// Returns the item text when `line` starts with `-`, `•`, `*`, `N.` or `N)`.
fn strip_list_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("**") {
        return None;
    }
    for marker in ['-', '•', '*'] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &trimmed[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .map(str::trim)
}

/// Uses an explicit `NN%` when the text has one, otherwise a word-sentiment nudge
/// around a neutral baseline.
fn estimate_keyword_match(raw: &str) -> u32 {
    if let Some(percent) = find_percentage(raw) {
        return clamp_score(percent as f64);
    }

    let lower = raw.to_lowercase();
    let count = |words: &[&str]| -> i64 {
        words
            .iter()
            .map(|w| lower.matches(w).count() as i64)
            .sum()
    };
    let score = BASELINE_SCORE + SENTIMENT_STEP * (count(POSITIVE_WORDS) - count(NEGATIVE_WORDS));
    clamp_score(score as f64)
}

/// First `<digits>%` occurrence in the text.
fn find_percentage(raw: &str) -> Option<u64> {
    let bytes = raw.as_bytes();
    for (idx, _) in raw.match_indices('%') {
        let start = bytes[..idx]
            .iter()
            .rposition(|b| !b.is_ascii_digit())
            .map_or(0, |p| p + 1);
        if start < idx {
            if let Ok(value) = raw[start..idx].parse::<u64>() {
                return Some(value);
            }
        }
    }
    None
}

fn preview(raw: &str) -> String {
    let mut head: String = raw.chars().take(OPTIMIZED_PREVIEW_CHARS).collect();
    head.push_str("...");
    head
}
