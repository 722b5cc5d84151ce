//! Anonymization engine settings

use crate::anonymization::terms::{cache::DEFAULT_MAX_BYTES, DEFAULT_PROTECTED_LABELS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for building an [`AnonymizationEngine`](super::AnonymizationEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationSettings {
    /// Language passed to the span detector
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub detector: DetectorSettings,

    #[serde(default)]
    pub protected_terms: ProtectedTermSettings,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl Default for AnonymizationSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            detector: DetectorSettings::default(),
            protected_terms: ProtectedTermSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl AnonymizationSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            anyhow::bail!("anonymization.language cannot be empty");
        }

        self.detector
            .validate()
            .context("Invalid detector configuration")?;
        self.protected_terms
            .validate()
            .context("Invalid protected term configuration")?;

        if self.cache.max_bytes == 0 {
            anyhow::bail!("anonymization.cache.max_bytes must be > 0");
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_LANGUAGE") {
            self.language = val;
        }

        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_DETECTOR_PATTERN_LIBRARY") {
            self.detector.pattern_library = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_DETECTOR_CONFIDENCE_THRESHOLD") {
            self.detector.confidence_threshold = val
                .parse()
                .context("Invalid MEDREDACT_ANONYMIZATION_DETECTOR_CONFIDENCE_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_PROTECTED_TERMS_LEXICON") {
            self.protected_terms.lexicon = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_PROTECTED_TERMS_LABELS") {
            self.protected_terms.labels = val
                .split(',')
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty())
                .collect();
        }

        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_CACHE_MAX_BYTES") {
            self.cache.max_bytes = val
                .parse()
                .context("Invalid MEDREDACT_ANONYMIZATION_CACHE_MAX_BYTES value")?;
        }
        if let Ok(val) = std::env::var("MEDREDACT_ANONYMIZATION_CACHE_TIME_TO_IDLE_SECS") {
            self.cache.time_to_idle_secs = Some(
                val.parse()
                    .context("Invalid MEDREDACT_ANONYMIZATION_CACHE_TIME_TO_IDLE_SECS value")?,
            );
        }

        Ok(())
    }
}

/// Span detector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// Path to pattern library TOML file; the embedded library when unset
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Patterns with a lower confidence are ignored
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            pattern_library: None,
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl DetectorSettings {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            );
        }
        if let Some(ref path) = self.pattern_library {
            validate_toml_path(path, "Pattern library")?;
        }
        Ok(())
    }
}

/// Protected-term tagging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedTermSettings {
    /// Lexicon TOML file; no terms are protected when unset
    #[serde(default)]
    pub lexicon: Option<PathBuf>,

    /// Tagger labels whose terms are protected
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

impl Default for ProtectedTermSettings {
    fn default() -> Self {
        Self {
            lexicon: None,
            labels: default_labels(),
        }
    }
}

impl ProtectedTermSettings {
    fn validate(&self) -> Result<()> {
        if self.labels.iter().any(|label| label.trim().is_empty()) {
            anyhow::bail!("labels cannot contain empty entries");
        }
        if let Some(ref path) = self.lexicon {
            validate_toml_path(path, "Lexicon")?;
        }
        Ok(())
    }
}

/// Protected-term cache bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Total weight of cached entries, in bytes of key text plus terms
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Evict entries not read for this many seconds
    #[serde(default)]
    pub time_to_idle_secs: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            time_to_idle_secs: None,
        }
    }
}

impl CacheSettings {
    pub fn time_to_idle(&self) -> Option<Duration> {
        self.time_to_idle_secs.map(Duration::from_secs)
    }
}

fn validate_toml_path(path: &std::path::Path, what: &str) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("{} file not found: {}", what, path.display());
    }
    if path.extension().and_then(|s| s.to_str()) != Some("toml") {
        anyhow::bail!("{} must be a TOML file: {}", what, path.display());
    }
    Ok(())
}

fn default_language() -> String {
    "en".to_string()
}

fn default_confidence_threshold() -> f32 {
    0.3
}

fn default_labels() -> Vec<String> {
    DEFAULT_PROTECTED_LABELS.iter().map(|l| l.to_string()).collect()
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}
