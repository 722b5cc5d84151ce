//! Configuration management for medredact.
//!
//! # Overview
//!
//! medredact reads an optional TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDREDACT_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`AnonymizationSettings`](crate::anonymization::AnonymizationSettings) -
//!   detector, protected terms, term cache and name redaction
//! - [`BatchConfig`] - Batch command concurrency
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! language = "en"
//!
//! [anonymization.detector]
//! confidence_threshold = 0.3
//!
//! [anonymization.protected_terms]
//! lexicon = "${MEDREDACT_LEXICON}"
//! labels = ["DISEASE", "DRUG", "MEDICAL_TERM"]
//!
//! [anonymization.cache]
//! max_bytes = 67108864
//! time_to_idle_secs = 3600
//!
//! [batch]
//! concurrency = 4
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use medredact::config::load_config;
//!
//! # fn example() {
//! match load_config("medredact.toml") {
//!     Ok(_config) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{ApplicationConfig, BatchConfig, LoggingConfig, RedactConfig};
