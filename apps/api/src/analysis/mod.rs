// Resume analysis engine
// JD keyword extraction → resume matching → ATS scoring → report assembly.
// Everything here is synchronous and pure; I/O lives in handlers.rs and crate::parser.

pub mod handlers;
pub mod keywords;
pub mod scorer;
pub mod vocabulary;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::{extract_keywords, find_matches};
use crate::analysis::vocabulary::Vocabulary;

const MAX_MISSING_KEYWORDS: usize = 10;
const MAX_SUGGESTED_KEYWORDS: usize = 5;
const TAILORING_THRESHOLD: u32 = 70;

pub const KEYWORD_SUGGESTION_PREFIX: &str = "Consider adding keywords like: ";
pub const TAILORING_SUGGESTION: &str =
    "Tailor your work experience bullets to match the job requirements more closely.";

/// Result of one resume-vs-JD analysis. Field names match the browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(rename = "atsScore")]
    pub score: u32,
    /// Sorted alphabetically.
    pub matched_keywords: Vec<String>,
    /// In JD extraction order, at most 10.
    pub missing_keywords: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Analyzes `resume_text` against the keywords of `jd_text`.
pub fn analyze(vocabulary: &Vocabulary, jd_text: &str, resume_text: &str) -> AnalysisReport {
    let jd_keywords = extract_keywords(jd_text, vocabulary);
    let matched_keywords = find_matches(resume_text, &jd_keywords, vocabulary);

    let matched: HashSet<&str> = matched_keywords.iter().map(String::as_str).collect();
    let missing_keywords: Vec<String> = jd_keywords
        .iter()
        .filter(|k| !matched.contains(k.as_str()))
        .take(MAX_MISSING_KEYWORDS)
        .cloned()
        .collect();

    let outcome = scorer::score(matched_keywords.len(), jd_keywords.len(), resume_text);
    let suggestions = build_suggestions(outcome.score, &missing_keywords);

    AnalysisReport {
        score: outcome.score,
        matched_keywords,
        missing_keywords,
        warnings: outcome.warnings,
        suggestions,
    }
}

fn build_suggestions(score: u32, missing: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !missing.is_empty() {
        let top: Vec<&str> = missing
            .iter()
            .take(MAX_SUGGESTED_KEYWORDS)
            .map(String::as_str)
            .collect();
        suggestions.push(format!("{KEYWORD_SUGGESTION_PREFIX}{}", top.join(", ")));
    }
    if score < TAILORING_THRESHOLD {
        suggestions.push(TAILORING_SUGGESTION.to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    fn strong_resume() -> String {
        "Alex Smith contact alex at example dot org phone on request \
         Work Experience Senior backend engineer shipping Java Spring Boot services on AWS with Docker \
         and Kubernetes while owning PostgreSQL schemas and Kafka consumers \
         Education MSc Software Engineering \
         Technical Skills Java Spring Boot Docker Kubernetes AWS PostgreSQL Kafka \
         Projects Maintainer of an open source message broker client"
            .to_string()
    }

    #[test]
    fn test_report_for_strong_resume() {
        let jd = "We need a Java engineer: Spring Boot, Docker, Kubernetes, AWS, PostgreSQL, Kafka";
        let report = analyze(&vocab(), jd, &strong_resume());

        assert_eq!(
            report.matched_keywords,
            vec!["AWS", "Docker", "Java", "Kafka", "Kubernetes", "PostgreSQL", "Spring Boot"]
        );
        assert!(report.missing_keywords.is_empty());
        assert_eq!(report.score, 100);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_missing_keywords_capped_at_ten_in_extraction_order() {
        let jd = "Java Python Ruby Rust Kotlin Swift Scala Perl Haskell Dart \
                  Django Flask Laravel Redis MongoDB";
        let report = analyze(&vocab(), jd, "nothing relevant here");

        assert!(report.matched_keywords.is_empty());
        assert_eq!(report.missing_keywords.len(), 10);
        assert_eq!(report.missing_keywords[0], "Java");
        assert_eq!(report.missing_keywords[9], "Dart");
    }

    #[test]
    fn test_keyword_suggestion_lists_first_five_missing() {
        let jd = "Java Python Ruby Rust Kotlin Swift Scala";
        let report = analyze(&vocab(), jd, "Scala only");

        let keyword_suggestions: Vec<&String> = report
            .suggestions
            .iter()
            .filter(|s| s.starts_with(KEYWORD_SUGGESTION_PREFIX))
            .collect();
        assert_eq!(keyword_suggestions.len(), 1);
        assert_eq!(
            keyword_suggestions[0],
            "Consider adding keywords like: Java, Python, Ruby, Rust, Kotlin"
        );
        assert!(report.suggestions.contains(&TAILORING_SUGGESTION.to_string()));
    }

    #[test]
    fn test_low_score_without_missing_keywords_still_suggests_tailoring() {
        // every keyword present, but the resume is tiny and has no sections
        let report = analyze(&vocab(), "Rust", "rust");
        assert!(report.missing_keywords.is_empty());
        assert!(report.score < 70);
        assert_eq!(report.suggestions, vec![TAILORING_SUGGESTION.to_string()]);
    }

    #[test]
    fn test_empty_jd_scores_zero() {
        let report = analyze(&vocab(), "", &strong_resume());
        assert_eq!(report.score, 0);
        assert!(report.matched_keywords.is_empty());
        assert!(report.missing_keywords.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.suggestions, vec![TAILORING_SUGGESTION.to_string()]);
    }

    #[test]
    fn test_report_serializes_with_client_field_names() {
        let report = analyze(&vocab(), "Java", "java");
        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "atsScore",
            "matchedKeywords",
            "missingKeywords",
            "warnings",
            "suggestions",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
