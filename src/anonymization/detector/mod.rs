//! Entity span detection
//!
//! The pipeline only depends on the [`SpanDetector`] trait. A statistical
//! model can be plugged in behind it; [`regex::PatternDetector`] is the
//! built-in implementation backed by a TOML pattern library.

pub mod patterns;
pub mod regex;

use crate::anonymization::models::EntitySpan;
use crate::domain::DetectorError;

/// Trait for span detector implementations
pub trait SpanDetector: Send + Sync {
    /// Detect spans of the requested entity types in `text`
    ///
    /// Returns [`DetectorError::NoRecognizersAvailable`] when no recognizer
    /// covers any of `entity_types` for `language`.
    fn detect(
        &self,
        text: &str,
        language: &str,
        entity_types: &[&str],
    ) -> Result<Vec<EntitySpan>, DetectorError>;
}
