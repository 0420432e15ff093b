//! Style and process analysis of markdown text.
//!
//! Extracts coarse style signals (headings, lists, emphasis, sentence
//! length) and writing-process markers (opening question, summary section,
//! call to action) from a document. The results feed the status display and
//! give the review prompt something concrete to anchor on.

use regex::Regex;

/// Average words-per-sentence thresholds for the length buckets.
const SHORT_SENTENCE_WORDS: f64 = 12.0;
const LONG_SENTENCE_WORDS: f64 = 20.0;

/// Style signals and process markers extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleProfile {
    pub style_elements: Vec<String>,
    pub process_steps: Vec<String>,
}

impl StyleProfile {
    /// True when nothing was detected (e.g. an empty document).
    pub fn is_empty(&self) -> bool {
        self.style_elements.is_empty() && self.process_steps.is_empty()
    }
}

/// Analyze markdown text for style elements and process steps.
///
/// Detection is deliberately shallow: regex probes, not a markdown parser.
/// Output ordering is fixed so the profile is stable across runs.
pub fn analyze_markdown(text: &str) -> StyleProfile {
    let mut profile = StyleProfile::default();

    if matches(r"(?m)^#+ ", text) {
        profile.style_elements.push("uses_headings".to_string());
    }
    if matches(r"(?m)^\s*[-*+] ", text) {
        profile.style_elements.push("uses_bullet_lists".to_string());
    }
    if matches(r"\*\*[^*]+\*\*", text) {
        profile.style_elements.push("uses_bold".to_string());
    }
    if matches(r"\*[^*]+\*", text) {
        profile.style_elements.push("uses_italic".to_string());
    }
    if let Some(bucket) = sentence_length_bucket(text) {
        profile.style_elements.push(bucket.to_string());
    }

    if let Some(first_line) = text.trim().lines().next() {
        if first_line.contains('?') {
            profile.process_steps.push("starts_with_question".to_string());
        }
    }
    if matches(r"(?i)summary", text) {
        profile.process_steps.push("has_summary_section".to_string());
    }
    if matches(r"(?i)call to action|let's|contact|subscribe|learn more", text) {
        profile.process_steps.push("has_call_to_action".to_string());
    }

    profile
}

/// Bucket the document by average sentence length, or `None` when the text
/// has no sentences to measure.
fn sentence_length_bucket(text: &str) -> Option<&'static str> {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        return None;
    }

    let total_words: usize = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .sum();
    let avg = total_words as f64 / sentences.len() as f64;

    if avg < SHORT_SENTENCE_WORDS {
        Some("short_sentences")
    } else if avg > LONG_SENTENCE_WORDS {
        Some("long_sentences")
    } else {
        Some("medium_sentences")
    }
}

fn matches(pattern: &str, text: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}
