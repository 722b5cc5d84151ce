//! Replace strategy - substitutes each span with its category token

use super::Anonymizer;
use crate::anonymization::models::EntitySpan;
use crate::anonymization::selector::TokenMap;
use crate::domain::AnonymizeError;
use std::cmp::Ordering;

/// Applies all spans in one left-to-right rebuild of the original text
///
/// Conflicts are settled before rewriting: overlapping spans of the same
/// entity type are merged into their union, then overlapping spans of
/// different types keep the higher score, the longer span, the earlier
/// start, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanReplacer;

impl SpanReplacer {
    pub fn new() -> Self {
        Self
    }

    /// Non-overlapping spans sorted by start offset
    pub fn resolve_conflicts(spans: &[EntitySpan]) -> Vec<EntitySpan> {
        let merged = merge_same_type(spans);

        let mut ranked = merged;
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(b.len().cmp(&a.len()))
                .then(a.start.cmp(&b.start))
                .then(a.entity_type.cmp(&b.entity_type))
        });

        let mut kept: Vec<EntitySpan> = Vec::with_capacity(ranked.len());
        for span in ranked {
            if !kept.iter().any(|k| k.overlaps(&span)) {
                kept.push(span);
            }
        }

        kept.sort_by_key(|span| span.start);
        kept
    }
}

fn merge_same_type(spans: &[EntitySpan]) -> Vec<EntitySpan> {
    let mut sorted: Vec<EntitySpan> = spans.iter().filter(|s| !s.is_empty()).cloned().collect();
    sorted.sort_by(|a, b| {
        a.entity_type
            .cmp(&b.entity_type)
            .then(a.start.cmp(&b.start))
            .then(b.end.cmp(&a.end))
    });

    let mut merged: Vec<EntitySpan> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if last.entity_type == span.entity_type && span.start < last.end => {
                last.end = last.end.max(span.end);
                last.score = last.score.max(span.score);
            }
            _ => merged.push(span),
        }
    }
    merged
}

impl Anonymizer for SpanReplacer {
    fn apply(
        &self,
        text: &str,
        spans: &[EntitySpan],
        tokens: &TokenMap,
    ) -> Result<String, AnonymizeError> {
        if let Some(bad) = spans.iter().find(|span| !span.is_valid_for(text)) {
            return Err(AnonymizeError::AnonymizationFailed(format!(
                "span {}..{} ({}) does not address the {}-byte input",
                bad.start,
                bad.end,
                bad.entity_type,
                text.len()
            )));
        }

        let resolved = Self::resolve_conflicts(spans);

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &resolved {
            output.push_str(&text[cursor..span.start]);
            match tokens.get(&span.entity_type) {
                Some(token) => output.push_str(token),
                None => {
                    output.push('<');
                    output.push_str(&span.entity_type);
                    output.push('>');
                }
            }
            cursor = span.end;
        }
        output.push_str(&text[cursor..]);

        Ok(output)
    }
}
