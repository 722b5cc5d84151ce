//! PII categories and the per-request category configuration

use serde::{Deserialize, Serialize};

/// Redactable PII category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    /// Calendar dates
    Date,
    /// Person names
    Name,
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// Driver license and passport numbers
    Id,
    /// Street addresses and PO boxes
    Address,
}

impl PiiCategory {
    /// All categories in selection order
    pub const ALL: [PiiCategory; 6] = [
        Self::Date,
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Id,
        Self::Address,
    ];

    /// Entity types requested from the span detector for this category
    pub fn entity_types(&self) -> &'static [&'static str] {
        match self {
            Self::Date => &["DATE"],
            Self::Name => &["PERSON"],
            Self::Email => &["EMAIL_ADDRESS"],
            Self::Phone => &["PHONE_NUMBER"],
            Self::Id => &["US_DRIVER_LICENSE", "US_PASSPORT"],
            Self::Address => &["ADDRESS"],
        }
    }

    /// Replacement token substituted for this category
    pub fn token(&self) -> &'static str {
        match self {
            Self::Date => "[Date_Anonymized]",
            Self::Name => "[Name_Anonymized]",
            Self::Email => "[Email_Anonymized]",
            Self::Phone => "[Phone_Anonymized]",
            Self::Id => "[ID_Anonymized]",
            Self::Address => "[Address_Anonymized]",
        }
    }

    /// Option key used in requests
    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Id => "id",
            Self::Address => "address",
        }
    }
}

/// Which categories are enabled for one request
///
/// Deserializes from the request `options` object. Missing keys are
/// disabled and unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizationConfig {
    pub date: bool,
    pub name: bool,
    pub email: bool,
    pub phone: bool,
    pub id: bool,
    pub address: bool,
}

impl AnonymizationConfig {
    /// Configuration with every category enabled
    pub fn all() -> Self {
        Self {
            date: true,
            name: true,
            email: true,
            phone: true,
            id: true,
            address: true,
        }
    }

    /// Configuration with exactly the given categories enabled
    pub fn with_categories(categories: &[PiiCategory]) -> Self {
        let mut config = Self::default();
        for category in categories {
            config.set(*category, true);
        }
        config
    }

    /// Whether a category is enabled
    pub fn is_enabled(&self, category: PiiCategory) -> bool {
        match category {
            PiiCategory::Date => self.date,
            PiiCategory::Name => self.name,
            PiiCategory::Email => self.email,
            PiiCategory::Phone => self.phone,
            PiiCategory::Id => self.id,
            PiiCategory::Address => self.address,
        }
    }

    /// Enable or disable a category
    pub fn set(&mut self, category: PiiCategory, enabled: bool) {
        let slot = match category {
            PiiCategory::Date => &mut self.date,
            PiiCategory::Name => &mut self.name,
            PiiCategory::Email => &mut self.email,
            PiiCategory::Phone => &mut self.phone,
            PiiCategory::Id => &mut self.id,
            PiiCategory::Address => &mut self.address,
        };
        *slot = enabled;
    }

    /// Enabled categories in selection order
    pub fn enabled(&self) -> impl Iterator<Item = PiiCategory> + '_ {
        PiiCategory::ALL
            .into_iter()
            .filter(move |category| self.is_enabled(*category))
    }
}
