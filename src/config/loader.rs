//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RedactConfig;
use crate::domain::errors::RedactError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "medredact.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RedactConfig
/// 4. Applies environment variable overrides (MEDREDACT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RedactError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use medredact::config::loader::load_config;
///
/// let config = load_config("medredact.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RedactConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RedactError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RedactError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: RedactConfig = toml::from_str(&contents)
        .map_err(|e| RedactError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads `path` if given, else `medredact.toml` if present, else defaults
///
/// Environment overrides and validation apply in every case. An explicit
/// path that does not exist is an error.
pub fn load_config_or_default(path: Option<&Path>) -> Result<RedactConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => {
            tracing::debug!(
                file = DEFAULT_CONFIG_FILE,
                "No configuration file found, using defaults"
            );
            finish(RedactConfig::default())
        }
    }
}

fn finish(mut config: RedactConfig) -> Result<RedactConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RedactError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left alone.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RedactError::Configuration(format!("Invalid substitution pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RedactError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using MEDREDACT_* prefix
///
/// Environment variables follow the pattern: MEDREDACT_<SECTION>_<KEY>,
/// for example MEDREDACT_BATCH_CONCURRENCY or
/// MEDREDACT_ANONYMIZATION_CACHE_MAX_BYTES.
fn apply_env_overrides(config: &mut RedactConfig) -> Result<()> {
    if let Ok(val) = std::env::var("MEDREDACT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| RedactError::Configuration(format!("{:#}", e)))?;

    if let Ok(val) = std::env::var("MEDREDACT_BATCH_CONCURRENCY") {
        config.batch.concurrency = val.parse().map_err(|_| {
            RedactError::Configuration(format!("Invalid MEDREDACT_BATCH_CONCURRENCY value: {}", val))
        })?;
    }

    if let Ok(val) = std::env::var("MEDREDACT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MEDREDACT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("MEDREDACT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
