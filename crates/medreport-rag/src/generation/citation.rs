//! Citation resolution: decide which retrieved documents the answer
//! actually drew from
//!
//! LLM self-citation is unreliable, so citation is decided here by keyword
//! overlap between the answer and each retrieved chunk, independent of both
//! the model's claims and the retrieval similarity score. A chunk can rank
//! high on similarity yet contribute nothing to the answer's wording;
//! citation is evidence of use, not evidence of relevance.

use std::collections::HashSet;

use crate::index::ScoredChunk;
use crate::types::{ChatResponse, Citation};

/// Placeholder when a chunk's metadata yields no usable document name
pub const UNKNOWN_DOCUMENT: &str = "Unknown Document";

/// A chunk is cited outright at this keyword-match percentage
const HIGH_CONFIDENCE_PCT: f32 = 40.0;

/// Below the high bar, a chunk is still cited at this percentage provided
/// it also clears the absolute match floor
const MEDIUM_CONFIDENCE_PCT: f32 = 25.0;

/// Minimum absolute keyword matches for the medium-confidence path; guards
/// against false positives from very small keyword sets
const MEDIUM_CONFIDENCE_FLOOR: usize = 4;

/// Phrases whose presence in the (lower-cased) answer marks it as a
/// refusal; refusals never carry citations
const REFUSAL_PHRASES: &[&str] = &[
    "don't have any",
    "do not have any",
    "no prescriptions",
    "not in your uploaded documents",
    "cannot find",
    "could not find",
    "no information about",
];

/// Words excluded from keyword extraction: common English function words
/// plus domain filler that appears in nearly every generated answer
const STOP_WORDS: &[&str] = &[
    // function words
    "about", "above", "after", "again", "all", "also", "and", "any", "are",
    "based", "because", "been", "before", "being", "below", "between", "both",
    "but", "can", "could", "did", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "had", "has", "have", "having", "her",
    "here", "him", "his", "how", "into", "its", "just", "may", "might", "more",
    "most", "must", "nor", "not", "now", "off", "once", "only", "other", "our",
    "out", "over", "own", "same", "shall", "she", "should", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "those", "through", "too", "under", "until", "very", "was", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "your", "yours",
    // domain filler
    "according", "advice", "answer", "consult", "doctor", "document",
    "documents", "healthcare", "indicates", "information", "medical",
    "mentioned", "patient", "please", "provider", "record", "records",
    "report", "reports", "stated", "uploaded",
];

/// Post-process a raw answer against the retrieved chunks, producing the
/// final response with its citation list.
pub fn resolve_citations(raw_answer: &str, retrieved: &[ScoredChunk]) -> ChatResponse {
    if is_refusal(raw_answer) {
        tracing::debug!("refusal detected in answer, suppressing citations");
        return ChatResponse::uncited(raw_answer);
    }

    let keywords = extract_keywords(raw_answer);
    if keywords.is_empty() {
        return ChatResponse::uncited(raw_answer);
    }

    let mut citations: Vec<Citation> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    // Chunks arrive pre-ordered by similarity; the first qualifying chunk
    // per document fixes that document's position in the citation list.
    for scored in retrieved {
        let text = scored.chunk.content.to_lowercase();
        let match_score = keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count();
        let match_percentage = match_score as f32 / keywords.len() as f32 * 100.0;

        let cited = match_percentage >= HIGH_CONFIDENCE_PCT
            || (match_percentage >= MEDIUM_CONFIDENCE_PCT
                && match_score >= MEDIUM_CONFIDENCE_FLOOR);
        if !cited {
            continue;
        }

        let name = scored
            .chunk
            .metadata
            .document_name()
            .map(clean_document_name)
            .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string());

        if seen.insert(name.clone()) {
            citations.push(Citation::new(name));
        }
    }

    tracing::debug!(
        keywords = keywords.len(),
        citations = citations.len(),
        "citations resolved"
    );

    ChatResponse {
        message: raw_answer.to_string(),
        citations,
    }
}

/// Check whether the answer is a refusal.
///
/// Exact membership over the fixed phrase set, not a classifier.
pub fn is_refusal(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    REFUSAL_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Extract candidate keywords from an answer: lower-cased whitespace
/// tokens, surrounding punctuation stripped, stop words removed, tokens
/// longer than three characters kept. Set semantics, no ordering.
pub fn extract_keywords(answer: &str) -> HashSet<String> {
    answer
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().count() > 3)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Clean a raw document name for citation display: strip directory
/// components (both separator styles) and the final file extension. Names
/// that clean down to nothing become the fixed placeholder.
pub fn clean_document_name(raw: &str) -> String {
    let base = raw
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(raw);

    let stem = match base.rfind('.') {
        Some(pos) => &base[..pos],
        None => base,
    };

    let stem = stem.trim();
    if stem.is_empty() {
        UNKNOWN_DOCUMENT.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, ReportChunk};

    fn scored(filename: Option<&str>, source: Option<&str>, content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: ReportChunk {
                chunk_index: 0,
                report_id: "r1".to_string(),
                user_id: "u1".to_string(),
                content: content.to_string(),
                embedding: Vec::new(),
                content_hash: String::new(),
                metadata: ChunkMetadata {
                    filename: filename.map(str::to_string),
                    source: source.map(str::to_string),
                    description: String::new(),
                    upload_date: chrono::Utc::now(),
                    report_type: "pdf".to_string(),
                    storage_uri: None,
                },
            },
            similarity: 0.8,
        }
    }

    #[test]
    fn refusal_answers_never_carry_citations() {
        let retrieved = vec![scored(
            Some("labs.pdf"),
            None,
            "diabetes insulin glucose fasting metformin",
        )];
        let response = resolve_citations(
            "I don't have any information about malaria in your uploaded documents.",
            &retrieved,
        );

        assert!(response.citations.is_empty());
        assert!(response.message.contains("malaria"));
    }

    #[test]
    fn refusal_detection_is_case_insensitive() {
        assert!(is_refusal("I CANNOT FIND that result."));
        assert!(is_refusal("There are No Prescriptions on file."));
        assert!(!is_refusal("Your HbA1c was 6.1% per the lab report."));
    }

    #[test]
    fn keywords_drop_stop_words_punctuation_and_short_tokens() {
        let keywords =
            extract_keywords("Based on your documents, the HbA1c (glycated) was 6.1%; consult a provider.");

        assert!(keywords.contains("hba1c"));
        assert!(keywords.contains("glycated"));
        // stop words and short tokens are gone
        assert!(!keywords.contains("based"));
        assert!(!keywords.contains("consult"));
        assert!(!keywords.contains("provider"));
        assert!(!keywords.contains("documents"));
        assert!(!keywords.contains("was"));
        assert!(!keywords.contains("6.1"));
    }

    #[test]
    fn keywords_are_a_set() {
        let keywords = extract_keywords("glucose glucose GLUCOSE glucose.");
        assert_eq!(keywords.len(), 1);
    }

    #[test]
    fn half_matching_keywords_clear_the_high_threshold() {
        // 4 keywords, chunk contains 2 of them: 50% >= 40% -> cited.
        let retrieved = vec![scored(
            Some("labs.pdf"),
            None,
            "Fasting glucose was elevated at the last draw.",
        )];
        let response = resolve_citations("diabetes insulin glucose fasting", &retrieved);

        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].document_name, "labs");
    }

    #[test]
    fn twenty_percent_match_is_below_both_thresholds() {
        // 10 keywords, chunk matches exactly 2: 20% -> not cited.
        let answer = "alpha1 beta2 gamma3 delta4 epsilon5 zeta6 eta7 theta8 iota9 kappa0";
        let retrieved = vec![scored(Some("labs.pdf"), None, "alpha1 beta2 only")];
        let response = resolve_citations(answer, &retrieved);

        assert_eq!(extract_keywords(answer).len(), 10);
        assert!(response.citations.is_empty());
    }

    #[test]
    fn medium_threshold_requires_the_absolute_floor() {
        // 3 keywords, 1 match: 33% clears 25% but floor of 4 is unmet.
        let retrieved = vec![scored(Some("labs.pdf"), None, "creatinine was normal")];
        let response = resolve_citations("creatinine bilirubin albumin", &retrieved);
        assert!(response.citations.is_empty());

        // 12 keywords, 4 matches: 33% with floor met -> cited.
        let answer = "word01 word02 word03 word04 word05 word06 word07 word08 word09 word10 word11 word12";
        let retrieved = vec![scored(Some("labs.pdf"), None, "word01 word02 word03 word04")];
        let response = resolve_citations(answer, &retrieved);
        assert_eq!(response.citations.len(), 1);
    }

    #[test]
    fn empty_keyword_set_qualifies_nothing() {
        let retrieved = vec![scored(Some("labs.pdf"), None, "some chunk text")];
        // All tokens are stop words or too short.
        let response = resolve_citations("it was the same", &retrieved);
        assert!(response.citations.is_empty());
    }

    #[test]
    fn document_names_are_cleaned() {
        assert_eq!(clean_document_name("users/abc123/report.pdf"), "report");
        assert_eq!(clean_document_name(r"C:\uploads\scan.final.pdf"), "scan.final");
        assert_eq!(clean_document_name("labs.pdf"), "labs");
        assert_eq!(clean_document_name("noextension"), "noextension");
        assert_eq!(clean_document_name(""), UNKNOWN_DOCUMENT);
        assert_eq!(clean_document_name(".pdf"), UNKNOWN_DOCUMENT);
        assert_eq!(clean_document_name("users/abc/"), UNKNOWN_DOCUMENT);
    }

    #[test]
    fn same_document_is_cited_once_in_first_qualifying_order() {
        let retrieved = vec![
            scored(Some("labs.pdf"), None, "glucose fasting insulin results"),
            scored(Some("mri.pdf"), None, "glucose fasting insulin diabetes"),
            scored(Some("archive/labs.pdf"), None, "glucose fasting diabetes insulin"),
        ];
        let response = resolve_citations("diabetes insulin glucose fasting", &retrieved);

        let names: Vec<&str> = response
            .citations
            .iter()
            .map(|c| c.document_name.as_str())
            .collect();
        assert_eq!(names, vec!["labs", "mri"]);
    }

    #[test]
    fn missing_filename_falls_back_to_source_then_placeholder() {
        let retrieved = vec![
            scored(None, Some("imports/summary.txt"), "glucose fasting insulin diabetes"),
            scored(None, None, "glucose fasting insulin diabetes"),
        ];
        let response = resolve_citations("diabetes insulin glucose fasting", &retrieved);

        let names: Vec<&str> = response
            .citations
            .iter()
            .map(|c| c.document_name.as_str())
            .collect();
        assert_eq!(names, vec!["summary", UNKNOWN_DOCUMENT]);
    }

    #[test]
    fn no_retrieved_chunks_means_no_citations() {
        let response = resolve_citations("glucose fasting insulin diabetes", &[]);
        assert!(response.citations.is_empty());
    }
}
