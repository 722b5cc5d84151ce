//! Literal name redaction
//!
//! Redacts every whole-word, case-insensitive occurrence of a caller-supplied
//! name. The whole list is compiled into one automaton and applied in a
//! single pass. Only when that automaton cannot be built does the redactor
//! fall back to fixed-size batches applied in list order.

use crate::anonymization::matcher::{is_word_char, WordMatcher};
use crate::anonymization::models::{NameList, ProtectedTermSet};
use crate::domain::NameRedactionError;

/// Batch size used when the single automaton cannot be built
pub const FALLBACK_BATCH_SIZE: usize = 500;

/// Result of a name redaction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRedaction {
    pub text: String,
    /// Occurrences replaced
    pub redacted: usize,
    /// Entries without word characters plus fallback batches that failed
    pub skipped: usize,
}

/// Case-insensitive whole-word redactor for literal names
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralNameRedactor;

impl LiteralNameRedactor {
    pub fn new() -> Self {
        Self
    }

    /// Names that will actually be matched, in list order
    ///
    /// Drops names equal to a protected term (case-sensitive) and blank
    /// entries, and skips entries that contain no word character. Length is
    /// not limited; an automaton that cannot be built falls back to batches.
    pub fn filter_names<'a>(
        &self,
        names: &'a NameList,
        protected_terms: &ProtectedTermSet,
    ) -> (Vec<&'a str>, usize) {
        let mut kept = Vec::with_capacity(names.len());
        let mut skipped = 0;

        for (index, name) in names.iter().enumerate() {
            if protected_terms.contains(name) {
                continue;
            }
            if name.trim().is_empty() {
                continue;
            }
            if !name.chars().any(is_word_char) {
                tracing::warn!(index, "Skipping name entry without word characters");
                skipped += 1;
                continue;
            }
            kept.push(name);
        }

        (kept, skipped)
    }

    /// Redact `names` from `text` with `token`
    pub fn redact(
        &self,
        text: &str,
        names: &NameList,
        protected_terms: &ProtectedTermSet,
        token: &str,
    ) -> NameRedaction {
        let (filtered, skipped) = self.filter_names(names, protected_terms);
        if filtered.is_empty() {
            return NameRedaction {
                text: text.to_string(),
                redacted: 0,
                skipped,
            };
        }

        match WordMatcher::new(&filtered) {
            Ok(matcher) => {
                let (text, redacted) = matcher.replace_all(text, |_| token);
                tracing::debug!(names = filtered.len(), redacted, "Redacted literal names");
                NameRedaction {
                    text,
                    redacted,
                    skipped,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    names = filtered.len(),
                    batch_size = FALLBACK_BATCH_SIZE,
                    "Name automaton too large, falling back to batches"
                );
                let mut result = self.redact_in_batches(text, &filtered, token, FALLBACK_BATCH_SIZE);
                result.skipped += skipped;
                result
            }
        }
    }

    /// Redact in sequential batches; batch `k` runs on batch `k - 1`'s output
    ///
    /// A batch that cannot be compiled is skipped and processing continues.
    pub fn redact_in_batches(
        &self,
        text: &str,
        names: &[&str],
        token: &str,
        batch_size: usize,
    ) -> NameRedaction {
        let mut current = text.to_string();
        let mut redacted = 0;
        let mut skipped = 0;

        for (batch, chunk) in names.chunks(batch_size.max(1)).enumerate() {
            match compile_batch(batch, chunk) {
                Ok(matcher) => {
                    let (next, count) = matcher.replace_all(&current, |_| token);
                    current = next;
                    redacted += count;
                }
                Err(e) => {
                    tracing::warn!(error = %e, names = chunk.len(), "Skipping name batch");
                    skipped += 1;
                }
            }
        }

        NameRedaction {
            text: current,
            redacted,
            skipped,
        }
    }
}

fn compile_batch(batch: usize, names: &[&str]) -> Result<WordMatcher, NameRedactionError> {
    WordMatcher::new(names).map_err(|e| NameRedactionError::BatchRedactionFailed {
        batch,
        reason: e.to_string(),
    })
}
