//! Regex-based span detector

use super::{patterns::PatternRegistry, SpanDetector};
use crate::anonymization::models::EntitySpan;
use crate::domain::DetectorError;
use anyhow::Result;
use std::sync::Arc;

/// Regex-based span detector
pub struct PatternDetector {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
    language: String,
}

impl PatternDetector {
    /// Create a new pattern detector with default patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new pattern detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.3,
            language: "en".to_string(),
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the language the recognizers are written for
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    fn no_recognizers(&self, language: &str, entity_types: &[&str]) -> DetectorError {
        DetectorError::NoRecognizersAvailable {
            language: language.to_string(),
            requested: entity_types.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SpanDetector for PatternDetector {
    fn detect(
        &self,
        text: &str,
        language: &str,
        entity_types: &[&str],
    ) -> Result<Vec<EntitySpan>, DetectorError> {
        if !language.eq_ignore_ascii_case(&self.language) {
            return Err(self.no_recognizers(language, entity_types));
        }

        let supported: Vec<&str> = entity_types
            .iter()
            .copied()
            .filter(|entity_type| self.pattern_registry.supports(entity_type))
            .collect();
        if supported.is_empty() {
            return Err(self.no_recognizers(language, entity_types));
        }

        let mut spans = Vec::new();
        for entity_type in supported {
            let Some(patterns) = self.pattern_registry.patterns_for_type(entity_type) else {
                continue;
            };
            for pattern in patterns {
                if pattern.confidence < self.confidence_threshold {
                    continue;
                }
                for matched in pattern.regex.find_iter(text) {
                    spans.push(EntitySpan::new(
                        pattern.entity_type.as_str(),
                        matched.start(),
                        matched.end(),
                        pattern.confidence,
                    ));
                }
            }
        }

        tracing::debug!(
            requested = entity_types.len(),
            detected = spans.len(),
            "Pattern detection finished"
        );

        Ok(spans)
    }
}
