//! Pattern library for span detection

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Entity type produced by these patterns (e.g. `DATE`)
    pub entity_type: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Regex patterns
    pub patterns: Vec<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Library entry the pattern came from
    pub name: String,
    pub regex: Regex,
    pub entity_type: String,
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry keyed by entity type
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    patterns_by_type: HashMap<String, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();
        let mut patterns_by_type: HashMap<String, Vec<CompiledPattern>> = HashMap::new();

        for (name, def) in library.patterns {
            let entity_type = def.entity_type.trim().to_uppercase();
            if entity_type.is_empty() {
                anyhow::bail!("Pattern '{name}' has an empty entity_type");
            }
            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Pattern '{name}' confidence must be within 0.0..=1.0, got {}",
                    def.confidence
                );
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                let compiled = CompiledPattern {
                    name: name.clone(),
                    regex,
                    entity_type: entity_type.clone(),
                    confidence: def.confidence,
                };

                patterns.push(compiled.clone());
                patterns_by_type
                    .entry(entity_type.clone())
                    .or_default()
                    .push(compiled);
            }
        }

        Ok(Self {
            patterns,
            patterns_by_type,
        })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific entity type
    pub fn patterns_for_type(&self, entity_type: &str) -> Option<&[CompiledPattern]> {
        self.patterns_by_type
            .get(entity_type)
            .map(|v| v.as_slice())
    }

    /// Whether any recognizer exists for the entity type
    pub fn supports(&self, entity_type: &str) -> bool {
        self.patterns_by_type.contains_key(entity_type)
    }
}
