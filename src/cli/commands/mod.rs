//! CLI command implementations

pub mod anonymize;
pub mod batch;
pub mod init;
pub mod validate;

use crate::anonymization::AnonymizationEngine;
use crate::config::{load_config_or_default, RedactConfig};
use anyhow::Context;
use std::path::Path;

/// Exit code for configuration errors
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Exit code for fatal span detector errors
pub const EXIT_DETECTOR_ERROR: i32 = 3;

/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Load the configuration and build an engine from it
///
/// Errors are reported to stderr; the caller exits with
/// [`EXIT_CONFIG_ERROR`].
fn prepare_engine(config_path: Option<&Path>) -> anyhow::Result<(RedactConfig, AnonymizationEngine)> {
    let config = load_config_or_default(config_path).context("Failed to load configuration")?;
    let engine = AnonymizationEngine::new(&config.anonymization)
        .context("Failed to build anonymization engine")?;
    Ok((config, engine))
}

/// Read a file, or stdin when `input` is `-`
async fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        use tokio::io::AsyncReadExt;
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read input file {}", input))
    }
}
