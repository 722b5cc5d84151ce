//! Init command implementation
//!
//! Writes a sample configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL};
use crate::config::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include comments for every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing medredact configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point anonymization.protected_terms.lexicon at a term lexicon");
                println!("  3. Validate configuration: medredact validate-config");
                println!("  4. Run: medredact anonymize --input request.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# medredact configuration

[application]
log_level = "info"

[anonymization]
language = "en"

[anonymization.detector]
confidence_threshold = 0.3

[anonymization.protected_terms]
labels = ["DISEASE", "DRUG", "MEDICAL_TERM"]

[anonymization.cache]
max_bytes = 67108864

[batch]
concurrency = 4

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# medredact configuration
#
# Every setting is optional. Values may reference environment variables
# with ${VAR_NAME}, and MEDREDACT_<SECTION>_<KEY> variables override them.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Language passed to the span detector
language = "en"

[anonymization.detector]
# Custom pattern library (TOML); the built-in library is used when unset
# pattern_library = "patterns/pii_patterns.toml"

# Patterns with a lower confidence are ignored (0.0 - 1.0)
confidence_threshold = 0.3

[anonymization.protected_terms]
# Term lexicon (TOML, [terms] LABEL = ["term", ...]); nothing is protected
# when unset
# lexicon = "${MEDREDACT_LEXICON}"

# Labels whose terms are never redacted
labels = ["DISEASE", "DRUG", "MEDICAL_TERM"]

[anonymization.cache]
# Upper bound on cached text plus protected terms, in bytes
max_bytes = 67108864

# Evict entries not read for this many seconds
# time_to_idle_secs = 3600

# ============================================================================
# Batch Command
# ============================================================================
[batch]
# Requests processed concurrently (1 - 256)
concurrency = 4

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to files in addition to stderr
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedactConfig;

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: RedactConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config, RedactConfig::default());
        }
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("medredact.toml");
        std::fs::write(&output, "").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG_ERROR);

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output).unwrap().contains("[anonymization]"));
    }
}
