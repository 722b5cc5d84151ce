//! Protected domain terms
//!
//! Terms tagged by a [`TermTagger`] (drugs, diseases, medical vocabulary)
//! are never redacted. Extraction results are memoized per input text in a
//! [`TermCache`].

pub mod cache;
pub mod extractor;
pub mod lexicon;

use crate::domain::TaggerError;
use serde::{Deserialize, Serialize};

pub use cache::TermCache;
pub use extractor::ProtectedTermExtractor;
pub use lexicon::LexiconTagger;

/// Labels kept as protected when no configuration overrides them
pub const DEFAULT_PROTECTED_LABELS: [&str; 3] = ["DISEASE", "DRUG", "MEDICAL_TERM"];

/// A term found by a tagger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedTerm {
    /// Term as spelled in the tagged text
    pub text: String,
    pub label: String,
}

impl TaggedTerm {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Trait for domain-term taggers
pub trait TermTagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedTerm>, TaggerError>;
}

/// Tagger that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTagger;

impl TermTagger for NoopTagger {
    fn tag(&self, _text: &str) -> Result<Vec<TaggedTerm>, TaggerError> {
        Ok(Vec::new())
    }
}
