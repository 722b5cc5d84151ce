//! Anonymize command implementation
//!
//! Reads one JSON request (`raw_data`, `names_list`, `options`) and writes
//! one JSON response (`anonymized`).

use super::{prepare_engine, read_input, EXIT_CONFIG_ERROR, EXIT_DETECTOR_ERROR, EXIT_FATAL};
use crate::anonymization::{AnonymizeRequest, AnonymizeResponse};
use crate::domain::RedactError;
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Request file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Response file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let (_config, engine) = match prepare_engine(config_path) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Configuration error");
                eprintln!("Configuration error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let body = read_input(&self.input).await?;
        let request: AnonymizeRequest = match serde_json::from_str(&body) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, "Invalid request");
                eprintln!("Invalid request: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let request_id = Uuid::new_v4();
        let response = {
            let _span = tracing::info_span!("anonymize", %request_id).entered();
            tracing::debug!(
                text_len = request.raw_data.len(),
                names = request.names_list.len(),
                "Request received"
            );

            match engine.handle(&request) {
                Ok(response) => response,
                Err(RedactError::Detector(e)) => {
                    crate::log_error_with_context!(&e, "anonymize");
                    eprintln!("Span detection failed: {e}");
                    return Ok(EXIT_DETECTOR_ERROR);
                }
                Err(e) => {
                    crate::log_error_with_context!(&e, "anonymize");
                    eprintln!("Anonymization failed: {e}");
                    return Ok(EXIT_FATAL);
                }
            }
        };

        self.write_response(&response).await?;
        Ok(0)
    }

    async fn write_response(&self, response: &AnonymizeResponse) -> anyhow::Result<()> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(response)?
        } else {
            serde_json::to_string(response)?
        };
        json.push('\n');

        match self.output {
            Some(ref path) => tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write response to {}", path.display())),
            None => {
                use tokio::io::AsyncWriteExt;
                let mut stdout = tokio::io::stdout();
                stdout.write_all(json.as_bytes()).await?;
                stdout.flush().await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_anonymize_file_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("request.json");
        let output = dir.path().join("response.json");
        std::fs::write(
            &input,
            r#"{"raw_data": "Call 555-123-4567", "names_list": [], "options": {"phone": true}}"#,
        )
        .unwrap();

        let args = AnonymizeArgs {
            input: input.to_string_lossy().to_string(),
            output: Some(output.clone()),
            pretty: false,
        };
        let code = args.execute(None).await.unwrap();
        assert_eq!(code, 0);

        let response: AnonymizeResponse =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(response.anonymized, "Call [Phone_Anonymized]");
    }

    #[tokio::test]
    async fn test_invalid_request_is_fatal() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("request.json");
        std::fs::write(&input, "not json").unwrap();

        let args = AnonymizeArgs {
            input: input.to_string_lossy().to_string(),
            output: None,
            pretty: false,
        };
        assert_eq!(args.execute(None).await.unwrap(), EXIT_FATAL);
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = AnonymizeArgs {
            input: "-".to_string(),
            output: None,
            pretty: false,
        };
        let code = args
            .execute(Some(Path::new("/nonexistent/medredact.toml")))
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
