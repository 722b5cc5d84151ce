//! Domain error types
//!
//! This module defines the error hierarchy for medredact. Collaborator
//! failures are closed enums so the pipeline can decide between failing soft
//! and failing hard without inspecting error text.

use thiserror::Error;

/// Main medredact error type
///
/// Only errors the caller must see are represented here. Soft failures
/// (no recognizers, applier failure, skipped name batches) are absorbed by
/// the pipeline and never reach this type.
#[derive(Debug, Error)]
pub enum RedactError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Fatal span detector errors
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised by a span detector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    /// None of the requested entity types has a recognizer for the language
    #[error("No matching recognizers were found for entities {requested:?} (language: {language})")]
    NoRecognizersAvailable {
        language: String,
        requested: Vec<String>,
    },

    /// Any other detector malfunction
    #[error("Span detection failed: {0}")]
    Failed(String),
}

impl DetectorError {
    /// Whether the pipeline should fall back to the raw text
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::NoRecognizersAvailable { .. })
    }
}

/// Errors raised by an anonymization applier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnonymizeError {
    /// The applier could not produce a rewritten document
    #[error("Anonymization failed: {0}")]
    AnonymizationFailed(String),
}

/// Errors raised by a protected-term tagger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaggerError {
    /// Tagging failed
    #[error("Term tagging failed: {0}")]
    Failed(String),
}

/// Errors raised while redacting literal names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameRedactionError {
    /// One fallback batch could not be compiled; it is skipped
    #[error("Name batch {batch} could not be redacted: {reason}")]
    BatchRedactionFailed { batch: usize, reason: String },
}

impl From<std::io::Error> for RedactError {
    fn from(err: std::io::Error) -> Self {
        RedactError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RedactError {
    fn from(err: serde_json::Error) -> Self {
        RedactError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RedactError {
    fn from(err: toml::de::Error) -> Self {
        RedactError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_error_display() {
        let err = RedactError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_detector_error_conversion() {
        let detector_err = DetectorError::Failed("model crashed".to_string());
        let err: RedactError = detector_err.into();
        assert!(matches!(err, RedactError::Detector(DetectorError::Failed(_))));
    }

    #[test]
    fn test_no_recognizers_is_soft() {
        let err = DetectorError::NoRecognizersAvailable {
            language: "en".to_string(),
            requested: vec!["PERSON".to_string()],
        };
        assert!(err.is_soft());
        assert!(!DetectorError::Failed("boom".to_string()).is_soft());
        assert!(err.to_string().contains("No matching recognizers"));
    }

    #[test]
    fn test_batch_error_display() {
        let err = NameRedactionError::BatchRedactionFailed {
            batch: 2,
            reason: "too large".to_string(),
        };
        assert_eq!(err.to_string(), "Name batch 2 could not be redacted: too large");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RedactError = io_err.into();
        assert!(matches!(err, RedactError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RedactError = json_err.into();
        assert!(matches!(err, RedactError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RedactError = toml_err.into();
        assert!(matches!(err, RedactError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &RedactError::Validation("x".to_string());
        let _: &dyn std::error::Error = &AnonymizeError::AnonymizationFailed("x".to_string());
        let _: &dyn std::error::Error = &TaggerError::Failed("x".to_string());
    }
}
