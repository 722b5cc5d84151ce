//! Validate config command implementation
//!
//! Loads the configuration, then builds the engine so that pattern library
//! and lexicon files are parsed as well.

use super::EXIT_CONFIG_ERROR;
use crate::anonymization::AnonymizationEngine;
use crate::config::{load_config_or_default, DEFAULT_CONFIG_FILE};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let shown = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("{} (optional)", DEFAULT_CONFIG_FILE));
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration file: {shown}");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded and validated");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Err(e) = AnonymizationEngine::new(&config.anonymization) {
            println!("❌ Failed to build anonymization engine");
            println!("   Error: {e:#}");
            return Ok(EXIT_CONFIG_ERROR);
        }
        println!("✅ Pattern library and lexicon loaded");

        let anonymization = &config.anonymization;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Language: {}", anonymization.language);
        println!(
            "  Pattern Library: {}",
            anonymization
                .detector
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        println!(
            "  Confidence Threshold: {}",
            anonymization.detector.confidence_threshold
        );
        println!(
            "  Lexicon: {}",
            anonymization
                .protected_terms
                .lexicon
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        println!("  Protected Labels: {:?}", anonymization.protected_terms.labels);
        println!("  Cache Max Bytes: {}", anonymization.cache.max_bytes);
        println!("  Batch Concurrency: {}", config.batch.concurrency);
        println!();
        Ok(0)
    }
}
