//! Span anonymization
//!
//! An [`Anonymizer`] rewrites a document given detected spans and the token
//! registered for each entity type.

pub mod replace;

use crate::anonymization::models::EntitySpan;
use crate::anonymization::selector::TokenMap;
use crate::domain::AnonymizeError;

pub use replace::SpanReplacer;

/// Trait for anonymization applier implementations
pub trait Anonymizer: Send + Sync {
    /// Replace every span of `text` with its entity type's token
    fn apply(
        &self,
        text: &str,
        spans: &[EntitySpan],
        tokens: &TokenMap,
    ) -> Result<String, AnonymizeError>;
}
