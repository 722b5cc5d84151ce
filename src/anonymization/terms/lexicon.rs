//! Lexicon-based term tagger
//!
//! Loads a TOML lexicon of the form
//!
//! ```toml
//! [terms]
//! DRUG = ["Warfarin", "Metformin"]
//! DISEASE = ["atrial fibrillation", "asthma"]
//! ```
//!
//! and tags whole-word, case-insensitive occurrences. Each tagged term is
//! reported with the spelling found in the document.

use super::{TaggedTerm, TermTagger};
use crate::anonymization::matcher::WordMatcher;
use crate::domain::TaggerError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Lexicon {
    terms: BTreeMap<String, Vec<String>>,
}

/// Tagger backed by a fixed term list
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    matcher: WordMatcher,
    labels: Vec<String>,
}

impl LexiconTagger {
    /// Load a lexicon from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read term lexicon: {}", path.as_ref().display())
        })?;
        Self::from_toml(&content)
    }

    /// Parse a lexicon from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let lexicon: Lexicon =
            toml::from_str(content).context("Failed to parse term lexicon TOML")?;

        let entries = lexicon.terms.into_iter().flat_map(|(label, terms)| {
            let label = label.trim().to_uppercase();
            terms.into_iter().map(move |term| (term, label.clone()))
        });
        Self::from_entries(entries)
    }

    /// Build a tagger from `(term, label)` pairs
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let (terms, labels): (Vec<String>, Vec<String>) = entries
            .into_iter()
            .map(|(term, label)| (term.trim().to_string(), label))
            .filter(|(term, _)| !term.is_empty())
            .unzip();

        let matcher = WordMatcher::new(&terms).context("Failed to compile term lexicon")?;
        Ok(Self { matcher, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl TermTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedTerm>, TaggerError> {
        let tagged = self
            .matcher
            .find_words(text)
            .into_iter()
            .map(|m| TaggedTerm::new(&text[m.start..m.end], self.labels[m.pattern].as_str()))
            .collect();
        Ok(tagged)
    }
}
