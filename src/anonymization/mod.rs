//! Selective PII anonymization
//!
//! This module redacts enabled PII categories from free text while keeping
//! protected domain terms intact and redacting a caller-supplied list of
//! literal names.
//!
//! # Architecture
//!
//! - **Selection**: enabled categories to entity types and tokens ([`selector`])
//! - **Protected terms**: tagger plus per-text cache ([`terms`])
//! - **Detection**: span detector trait and a regex implementation ([`detector`])
//! - **Rewriting**: span replacement ([`anonymizer`]) and term restoration ([`restore`])
//! - **Names**: single-pass literal name redaction ([`names`])
//! - **Engine**: the pipeline tying these together ([`engine`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use medredact::anonymization::{AnonymizationEngine, AnonymizationSettings};
//!
//! let engine = AnonymizationEngine::new(&AnonymizationSettings::default())?;
//! let response = engine.handle(&request)?;
//! ```

pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod engine;
pub mod matcher;
pub mod models;
pub mod names;
pub mod restore;
pub mod selector;
pub mod terms;

// Re-export main types
pub use config::AnonymizationSettings;
pub use engine::AnonymizationEngine;
pub use models::{
    AnonymizationConfig, AnonymizeRequest, AnonymizeResponse, NameList, PiiCategory,
    RedactionOutcome,
};
