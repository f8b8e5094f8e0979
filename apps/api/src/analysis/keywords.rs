//! Keyword extraction and matching against the skills dictionary.
//!
//! Extraction runs two explicit passes: multi-word phrases first, then single tokens.
//! The phrase pass has to come first so that "Spring Boot" is recognised as a whole
//! before its constituent token "spring" is looked at.

use indexmap::IndexSet;

use crate::analysis::vocabulary::{boundary_regex, strategy_for, MatchStrategy, Vocabulary};

/// Ordered, deduplicated set of canonical terms (first-seen wins).
pub type TermSet = IndexSet<String>;

/// Extracts every dictionary term present in `text`, as canonical display names.
///
/// Order: phrase matches in dictionary order, then token matches in text order.
pub fn extract_keywords(text: &str, vocabulary: &Vocabulary) -> TermSet {
    let mut extracted = TermSet::new();
    if text.trim().is_empty() {
        return extracted;
    }

    let lower = text.to_lowercase();

    // Pass 1: phrases. Matched phrases are blanked out of `remaining` so their
    // words cannot be picked up again as single tokens.
    let mut remaining = lower.clone();
    for phrase in vocabulary.phrases() {
        if phrase.is_match(&lower) {
            if let Some(canonical) = vocabulary.lookup(&phrase.key) {
                extracted.insert(canonical.to_string());
            }
            remaining = phrase.erase(&remaining).into_owned();
        }
    }

    // Pass 2: tokens
    let normalized = normalize_for_tokens(&remaining);
    for token in normalized.split_whitespace() {
        if vocabulary.is_blocked(token) {
            continue;
        }
        if let Some(canonical) = vocabulary.lookup(token) {
            extracted.insert(canonical.to_string());
        }
    }

    extracted
}

/// Replaces everything except `a-z`, `0-9`, whitespace, `#`, `+` and `.` with a space.
fn normalize_for_tokens(lower: &str) -> String {
    lower
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || c.is_whitespace()
                || matches!(c, '#' | '+' | '.')
            {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn term_occurs(lower_text: &str, lower_term: &str, vocabulary: &Vocabulary) -> bool {
    match strategy_for(lower_term) {
        MatchStrategy::Substring => lower_text.contains(lower_term),
        MatchStrategy::WordBoundary => match vocabulary.boundary_pattern(lower_term) {
            Some(pattern) => pattern.is_match(lower_text),
            // terms from outside the dictionary get a one-off pattern
            None => match boundary_regex(lower_term) {
                Ok(pattern) => pattern.is_match(lower_text),
                Err(e) => {
                    tracing::debug!("Boundary pattern for '{lower_term}' failed ({e}); using substring match");
                    lower_text.contains(lower_term)
                }
            },
        },
    }
}

/// Returns the terms from `terms` that occur in `candidate_text`, sorted alphabetically.
///
/// Symbol-bearing terms are matched by plain containment, so short ones such as
/// `c++` can match inside unrelated text. Dictionary terms reuse the vocabulary's
/// precompiled boundary patterns.
pub fn find_matches<'a, I>(
    candidate_text: &str,
    terms: I,
    vocabulary: &Vocabulary,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let lower_text = candidate_text.to_lowercase();

    let mut matched: Vec<String> = terms
        .into_iter()
        .filter(|term| {
            !lower_text.is_empty() && term_occurs(&lower_text, &term.to_lowercase(), vocabulary)
        })
        .cloned()
        .collect();
    matched.sort();
    matched
}
