//! Protected-term restoration
//!
//! Two passes keep protected terms intact:
//!
//! - [`ProtectedTermRestorer::shield`] carves protected-term occurrences out
//!   of detected spans before they are applied, so a span that swallowed a
//!   drug name still redacts its neighbours but not the drug.
//! - [`ProtectedTermRestorer::restore`] rewrites every case-insensitive,
//!   whole-word occurrence in the anonymized text back to the term's
//!   original spelling.

use crate::anonymization::matcher::{is_word_char, WordMatcher};
use crate::anonymization::models::{EntitySpan, ProtectedTermSet};

/// Restores protected terms over rewritten text
#[derive(Debug, Clone)]
pub struct ProtectedTermRestorer {
    terms: Vec<String>,
    matcher: Option<WordMatcher>,
}

impl ProtectedTermRestorer {
    /// Compile a restorer for `terms`
    ///
    /// If the terms cannot be compiled the restorer degrades to a no-op and
    /// logs a warning.
    pub fn new(terms: &ProtectedTermSet) -> Self {
        let terms: Vec<String> = terms.iter().map(str::to_string).collect();
        let matcher = if terms.is_empty() {
            None
        } else {
            match WordMatcher::new(&terms) {
                Ok(matcher) => Some(matcher),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        terms = terms.len(),
                        "Failed to compile protected terms, restoration disabled"
                    );
                    None
                }
            }
        };

        Self { terms, matcher }
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_none()
    }

    /// Remove protected-term occurrences in `text` from `spans`
    ///
    /// Pieces left after carving lose their leading and trailing non-word
    /// characters and are dropped when nothing remains. Spans that do not
    /// overlap a protected term, or do not address `text`, pass through
    /// untouched; the applier rejects the invalid ones.
    pub fn shield(&self, text: &str, spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
        let Some(matcher) = &self.matcher else {
            return spans;
        };

        let protected = matcher.find_words(text);
        if protected.is_empty() {
            return spans;
        }

        let mut shielded = Vec::with_capacity(spans.len());
        for span in spans {
            if !span.is_valid_for(text) {
                shielded.push(span);
                continue;
            }

            let (span_start, span_end) = (span.start, span.end);
            let mut overlapping = protected
                .iter()
                .filter(|o| o.start < span_end && o.end > span_start)
                .peekable();
            if overlapping.peek().is_none() {
                shielded.push(span);
                continue;
            }

            let mut cursor = span.start;
            for occurrence in overlapping {
                push_piece(text, &span, cursor, occurrence.start, &mut shielded);
                cursor = cursor.max(occurrence.end);
            }
            push_piece(text, &span, cursor, span.end, &mut shielded);
        }
        shielded
    }

    /// Restore the original spelling of every protected-term occurrence
    ///
    /// An occurrence already spelled like one of the terms is kept as is, so
    /// a term tagged in several casings keeps each of them.
    pub fn restore(&self, rewritten: &str) -> String {
        let Some(matcher) = &self.matcher else {
            return rewritten.to_string();
        };

        let terms = &self.terms;
        let (restored, count) = matcher.replace_all(rewritten, |m| {
            let found = &rewritten[m.start..m.end];
            if terms.binary_search_by(|term| term.as_str().cmp(found)).is_ok() {
                found
            } else {
                terms[m.pattern].as_str()
            }
        });
        tracing::debug!(occurrences = count, "Restored protected terms");
        restored
    }
}

fn push_piece(text: &str, span: &EntitySpan, start: usize, end: usize, out: &mut Vec<EntitySpan>) {
    if start >= end {
        return;
    }
    let piece = &text[start..end];
    let trimmed = piece.trim_matches(|c: char| !is_word_char(c));
    if trimmed.is_empty() {
        return;
    }
    let leading = piece.len() - piece.trim_start_matches(|c: char| !is_word_char(c)).len();
    let trimmed_start = start + leading;
    let trimmed_end = trimmed_start + trimmed.len();
    out.push(EntitySpan::new(
        span.entity_type.as_str(),
        trimmed_start,
        trimmed_end,
        span.score,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restorer(terms: &[&str]) -> ProtectedTermRestorer {
        let set: ProtectedTermSet = terms.iter().copied().collect();
        ProtectedTermRestorer::new(&set)
    }

    #[test]
    fn test_restore_original_casing() {
        let r = restorer(&["Warfarin"]);
        assert_eq!(
            r.restore("WARFARIN daily, then warfarin weekly"),
            "Warfarin daily, then Warfarin weekly"
        );
    }

    #[test]
    fn test_restore_keeps_each_tagged_casing() {
        let r = restorer(&["WARFARIN", "warfarin"]);
        assert_eq!(
            r.restore("warfarin then WARFARIN then Warfarin"),
            "warfarin then WARFARIN then WARFARIN"
        );
    }

    #[test]
    fn test_restore_leaves_tokens_alone() {
        let r = restorer(&["Anonymized", "Date"]);
        let text = "[Date_Anonymized] seen";
        assert_eq!(r.restore(text), text);
    }

    #[test]
    fn test_empty_terms_is_identity() {
        let r = restorer(&[]);
        assert!(r.is_empty());
        assert_eq!(r.restore("Anything"), "Anything");
    }

    #[test]
    fn test_shield_carves_term_from_span() {
        let text = "Patient Jane Warfarin Smith arrived";
        let start = text.find("Jane").unwrap();
        let end = text.find(" arrived").unwrap();
        let spans = vec![EntitySpan::new("PERSON", start, end, 0.8)];

        let shielded = restorer(&["Warfarin"]).shield(text, spans);
        let pieces: Vec<&str> = shielded.iter().map(|s| &text[s.start..s.end]).collect();
        assert_eq!(pieces, vec!["Jane", "Smith"]);
        assert!(shielded.iter().all(|s| s.entity_type == "PERSON"));
    }

    #[test]
    fn test_shield_drops_span_equal_to_term() {
        let text = "Give Warfarin now";
        let start = text.find("Warfarin").unwrap();
        let spans = vec![EntitySpan::new("PERSON", start, start + 8, 0.8)];
        assert!(restorer(&["Warfarin"]).shield(text, spans).is_empty());
    }

    #[test]
    fn test_shield_keeps_unrelated_spans() {
        let text = "Warfarin on 01/02/2023";
        let start = text.find("01").unwrap();
        let spans = vec![EntitySpan::new("DATE", start, text.len(), 0.85)];
        let shielded = restorer(&["Warfarin"]).shield(text, spans.clone());
        assert_eq!(shielded, spans);
    }

    #[test]
    fn test_shield_drops_punctuation_only_pieces() {
        let text = "Warfarin, Smith";
        let spans = vec![EntitySpan::new("PERSON", 0, text.len(), 0.8)];
        let shielded = restorer(&["Warfarin"]).shield(text, spans);
        assert_eq!(shielded.len(), 1);
        assert_eq!(&text[shielded[0].start..shielded[0].end], "Smith");
    }
}
