//! ATS Scorer — deterministic 0–100 score for a resume against extracted JD keywords.
//!
//! score = skill match (50) + section completeness (25) + formatting (15) + keyword frequency (10),
//! truncated to an integer and clamped to [0, 100].

use serde::Serialize;

const SKILL_MATCH_WEIGHT: f64 = 50.0;
const SECTION_WEIGHT: f64 = 25.0;
const FORMATTING_BASE: f64 = 15.0;
const FREQUENCY_WEIGHT: f64 = 10.0;

/// Matches at or above this count earn the full frequency score.
const FULL_FREQUENCY_MATCHES: usize = 5;
const MIN_SECTIONS_WITHOUT_WARNING: usize = 4;
const MIN_TEXT_CHARS: usize = 300;

pub const WARN_SECTIONS: &str =
    "Common resume sections (Experience, Education, Skills) were not clearly detected.";
pub const WARN_SYMBOLS: &str =
    "Excessive special characters/symbols detected. This can confuse ATS parsers.";
pub const WARN_LINE_BREAKS: &str =
    "Too many line breaks detected. Ensure your layout isn't overly fragmented.";
pub const WARN_SHORT_TEXT: &str =
    "Extracted text length is very low. Ensure your document is text-based and not an image.";

/// Resume sections and the lowercase markers that count as evidence for each.
const SECTIONS: &[(&str, &[&str])] = &[
    ("experience", &["experience", "work experience", "employment"]),
    ("education", &["education", "academic"]),
    ("skills", &["skills", "technical skills"]),
    ("projects", &["projects"]),
    ("contact", &["contact", "email", "phone"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: u32,
    pub warnings: Vec<String>,
}

/// Scores a resume. `matched_count` of `total_count` JD keywords were found in `resume_text`.
///
/// With no JD keywords there is nothing to evaluate and the score is 0.
pub fn score(matched_count: usize, total_count: usize, resume_text: &str) -> ScoreOutcome {
    let mut warnings = Vec::new();

    if total_count == 0 {
        return ScoreOutcome { score: 0, warnings };
    }

    let skill_match = (matched_count as f64 / total_count as f64) * SKILL_MATCH_WEIGHT;
    let sections = section_score(resume_text, &mut warnings);
    let formatting = formatting_score(resume_text, &mut warnings);
    let frequency = frequency_score(matched_count);

    let total = (skill_match + sections + formatting + frequency).trunc();
    ScoreOutcome {
        score: total.clamp(0.0, 100.0) as u32,
        warnings,
    }
}

fn section_score(text: &str, warnings: &mut Vec<String>) -> f64 {
    let lower = text.to_lowercase();
    let found = SECTIONS
        .iter()
        .filter(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .count();

    if found < MIN_SECTIONS_WITHOUT_WARNING {
        warnings.push(WARN_SECTIONS.to_string());
    }

    (found as f64 / SECTIONS.len() as f64) * SECTION_WEIGHT
}

fn formatting_score(text: &str, warnings: &mut Vec<String>) -> f64 {
    let mut score = FORMATTING_BASE;
    let length = text.chars().count();

    let symbols = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    if symbols as f64 > length as f64 * 0.1 {
        warnings.push(WARN_SYMBOLS.to_string());
        score -= 5.0;
    }

    if line_count(text) > length / 20 {
        warnings.push(WARN_LINE_BREAKS.to_string());
        score -= 3.0;
    }

    if length < MIN_TEXT_CHARS {
        warnings.push(WARN_SHORT_TEXT.to_string());
        score -= 7.0;
    }

    score.max(0.0)
}

/// Number of `\n`-separated lines, ignoring trailing empty lines.
/// An empty text counts as one line.
fn line_count(text: &str) -> usize {
    if text.is_empty() {
        return 1;
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let trailing_empty = lines.iter().rev().take_while(|l| l.is_empty()).count();
    lines.len() - trailing_empty
}

fn frequency_score(matched_count: usize) -> f64 {
    if matched_count >= FULL_FREQUENCY_MATCHES {
        FREQUENCY_WEIGHT
    } else {
        matched_count as f64 * 2.0
    }
}
