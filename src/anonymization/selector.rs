//! Category selection
//!
//! Turns the enabled categories of a request into the entity types to
//! request from the span detector and the token to substitute for each.

use crate::anonymization::models::{AnonymizationConfig, PiiCategory};
use std::collections::HashMap;

/// Entity type → replacement token
pub type TokenMap = HashMap<String, String>;

/// Entity types and tokens for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    /// Ordered, deduplicated entity types
    pub entity_types: Vec<&'static str>,
    pub tokens: TokenMap,
    categories: Vec<PiiCategory>,
}

impl CategorySelection {
    pub fn is_empty(&self) -> bool {
        self.entity_types.is_empty()
    }

    /// True when email is the only enabled category
    pub fn is_email_only(&self) -> bool {
        self.categories == [PiiCategory::Email]
    }

    pub fn includes(&self, category: PiiCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Maps an [`AnonymizationConfig`] to a [`CategorySelection`]
pub struct CategorySelector;

impl CategorySelector {
    pub fn select(config: &AnonymizationConfig) -> CategorySelection {
        let mut selection = CategorySelection::default();

        for category in config.enabled() {
            selection.categories.push(category);
            for entity_type in category.entity_types() {
                if !selection.entity_types.contains(entity_type) {
                    selection.entity_types.push(entity_type);
                }
                selection
                    .tokens
                    .insert((*entity_type).to_string(), category.token().to_string());
            }
        }

        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_enabled() {
        let selection = CategorySelector::select(&AnonymizationConfig::default());
        assert!(selection.is_empty());
        assert!(selection.tokens.is_empty());
        assert!(!selection.is_email_only());
    }

    #[test]
    fn test_all_enabled_order() {
        let selection = CategorySelector::select(&AnonymizationConfig::all());
        assert_eq!(
            selection.entity_types,
            vec![
                "DATE",
                "PERSON",
                "EMAIL_ADDRESS",
                "PHONE_NUMBER",
                "US_DRIVER_LICENSE",
                "US_PASSPORT",
                "ADDRESS"
            ]
        );
        assert_eq!(selection.tokens.len(), 7);
    }

    #[test]
    fn test_id_tokens() {
        let selection =
            CategorySelector::select(&AnonymizationConfig::with_categories(&[PiiCategory::Id]));
        assert_eq!(selection.tokens["US_DRIVER_LICENSE"], "[ID_Anonymized]");
        assert_eq!(selection.tokens["US_PASSPORT"], "[ID_Anonymized]");
    }

    #[test]
    fn test_email_only() {
        let selection =
            CategorySelector::select(&AnonymizationConfig::with_categories(&[PiiCategory::Email]));
        assert!(selection.is_email_only());

        let selection = CategorySelector::select(&AnonymizationConfig::with_categories(&[
            PiiCategory::Email,
            PiiCategory::Name,
        ]));
        assert!(!selection.is_email_only());
        assert!(selection.includes(PiiCategory::Name));
    }

    #[test]
    fn test_deterministic() {
        let config = AnonymizationConfig::with_categories(&[PiiCategory::Date, PiiCategory::Phone]);
        assert_eq!(CategorySelector::select(&config), CategorySelector::select(&config));
    }
}
