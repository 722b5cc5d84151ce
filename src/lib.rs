// medredact - Selective PII Redaction for Clinical Text
// Copyright (c) 2025 medredact Contributors
// Licensed under the MIT License

//! # medredact - selective PII redaction
//!
//! medredact removes selected categories of personally identifiable
//! information from free text while leaving protected domain vocabulary
//! (drugs, diseases, medical terms) untouched, and additionally redacts an
//! explicit list of literal names.
//!
//! ## Overview
//!
//! One request carries the text, a list of names and the categories to
//! redact (`date`, `name`, `email`, `phone`, `id`, `address`). The engine:
//!
//! - **Detects** entity spans for the enabled categories
//! - **Shields** protected terms so no span can swallow them
//! - **Rewrites** every span with its category token, e.g. `[Date_Anonymized]`
//! - **Restores** the original spelling of protected terms
//! - **Redacts** listed names case-insensitively, whole word only
//!
//! Soft failures (no recognizer for the requested types, a span the applier
//! cannot use) return the input unchanged. Only a malfunctioning detector is
//! an error.
//!
//! ## Architecture
//!
//! - [`anonymization`] - The redaction engine and its collaborators
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration management
//! - [`domain`] - Error types
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medredact::anonymization::{AnonymizationEngine, AnonymizationSettings, AnonymizeRequest};
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = AnonymizationEngine::new(&AnonymizationSettings::default())?;
//!
//!     let request: AnonymizeRequest = serde_json::from_str(
//!         r#"{"raw_data": "Call John Doe at 555-123-4567",
//!             "names_list": ["John Doe"],
//!             "options": {"name": true, "phone": true}}"#,
//!     )?;
//!     let response = engine.handle(&request)?;
//!
//!     assert_eq!(response.anonymized, "Call [Name_Anonymized] at [Phone_Anonymized]");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library calls return [`domain::RedactError`]; collaborator failures use
//! closed enums so the engine decides between failing soft and failing hard
//! without inspecting messages.
//!
//! ## Logging
//!
//! medredact logs with the `tracing` crate and never logs document text or
//! name values, only lengths and counts.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
