//! Batch command implementation
//!
//! Processes a JSON Lines file of requests and writes one response line per
//! request, in input order. Requests run on blocking tasks with bounded
//! concurrency. A shutdown signal stops scheduling new requests; requests
//! already running are finished and written.

use super::{prepare_engine, EXIT_CONFIG_ERROR};
use crate::anonymization::{AnonymizationEngine, AnonymizeRequest, AnonymizeResponse};
use crate::domain::RedactError;
use anyhow::Context;
use clap::Args;
use futures::{future, stream, StreamExt};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use uuid::Uuid;

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON Lines file with one request per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override batch.concurrency
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Counters for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Lines written
    pub processed: usize,
    /// Requests answered with the unchanged input after a soft failure
    pub fail_soft: usize,
    /// Lines answered with an `{"error": ...}` object
    pub errors: usize,
    /// Lines not scheduled because of a shutdown signal
    pub interrupted: bool,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn is_successful(&self) -> bool {
        self.errors == 0 && !self.interrupted
    }
}

/// Result of one input line
#[derive(Debug)]
struct LineResult {
    json: String,
    fail_soft: bool,
    error: bool,
}

impl BatchArgs {
    /// Execute the batch command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let (config, engine) = match prepare_engine(config_path) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Configuration error");
                eprintln!("Configuration error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let concurrency = self.concurrency.unwrap_or(config.batch.concurrency).max(1);
        let contents = tokio::fs::read_to_string(&self.input)
            .await
            .with_context(|| format!("Failed to read input file {}", self.input.display()))?;
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();

        tracing::info!(
            lines = lines.len(),
            concurrency,
            "Starting batch anonymization"
        );

        let mut writer: Box<dyn Write + Send> = match self.output {
            Some(ref path) => Box::new(std::io::BufWriter::new(
                std::fs::File::create(path)
                    .with_context(|| format!("Failed to create output file {}", path.display()))?,
            )),
            None => Box::new(std::io::BufWriter::new(std::io::stdout())),
        };

        let summary = run_batch(
            Arc::new(engine),
            lines,
            concurrency,
            shutdown_signal,
            &mut writer,
        )
        .await?;
        writer.flush()?;

        eprintln!();
        eprintln!("📊 Batch Summary:");
        eprintln!("  Processed: {}", summary.processed);
        eprintln!("  Returned unchanged (fail soft): {}", summary.fail_soft);
        eprintln!("  Errors: {}", summary.errors);
        eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());

        let exit_code = if summary.interrupted {
            eprintln!("⚠️  Batch interrupted; remaining lines were not processed.");
            tracing::info!("Batch interrupted by user signal");
            130
        } else if summary.is_successful() {
            0
        } else {
            eprintln!("⚠️  Batch completed with errors");
            1
        };

        Ok(exit_code)
    }
}

/// Anonymize `lines` and write one output line per non-blank input line
///
/// Output order matches input order. At most `concurrency` requests run at
/// once. Once `shutdown_signal` is set no further lines are scheduled.
pub async fn run_batch<W: Write + ?Sized>(
    engine: Arc<AnonymizationEngine>,
    lines: Vec<String>,
    concurrency: usize,
    shutdown_signal: watch::Receiver<bool>,
    writer: &mut W,
) -> anyhow::Result<BatchSummary> {
    let started = Instant::now();
    let mut summary = BatchSummary::default();
    let scheduled = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .count();

    let shutdown = shutdown_signal.clone();
    let mut results = Box::pin(
        stream::iter(
            lines
                .into_iter()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty()),
        )
        .take_while(move |_| future::ready(!*shutdown.borrow()))
        .map(|(index, line)| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || process_line(&engine, index + 1, &line))
        })
        .buffered(concurrency.max(1)),
    );

    while let Some(joined) = results.next().await {
        let result = joined.context("Batch worker panicked")?;
        writeln!(writer, "{}", result.json)?;

        summary.processed += 1;
        if result.fail_soft {
            summary.fail_soft += 1;
        }
        if result.error {
            summary.errors += 1;
        }
        if summary.processed % 1000 == 0 {
            tracing::debug!(
                current = summary.processed,
                total = scheduled,
                "Processing batch"
            );
        }
    }

    summary.interrupted = summary.processed < scheduled;
    summary.duration = started.elapsed();

    tracing::info!(
        processed = summary.processed,
        fail_soft = summary.fail_soft,
        errors = summary.errors,
        interrupted = summary.interrupted,
        duration_ms = summary.duration.as_millis() as u64,
        "Batch anonymization finished"
    );

    Ok(summary)
}

fn process_line(engine: &AnonymizationEngine, line_number: usize, line: &str) -> LineResult {
    let request_id = Uuid::new_v4();
    let _span = tracing::info_span!("batch_line", line = line_number, %request_id).entered();

    let request: AnonymizeRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid request line");
            return error_line(format!("invalid request at line {}: {}", line_number, e));
        }
    };

    match engine.anonymize(&request.raw_data, &request.names_list, &request.options) {
        Ok(outcome) => {
            let fail_soft = outcome.is_fail_soft();
            match serde_json::to_string(&AnonymizeResponse::from(outcome)) {
                Ok(json) => LineResult {
                    json,
                    fail_soft,
                    error: false,
                },
                Err(e) => error_line(RedactError::from(e).to_string()),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            error_line(e.to_string())
        }
    }
}

fn error_line(message: String) -> LineResult {
    LineResult {
        json: json!({ "error": message }).to_string(),
        fail_soft: false,
        error: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::AnonymizationSettings;

    fn engine() -> Arc<AnonymizationEngine> {
        Arc::new(AnonymizationEngine::new(&AnonymizationSettings::default()).unwrap())
    }

    fn request(raw: &str) -> String {
        json!({ "raw_data": raw, "names_list": [], "options": { "date": true } }).to_string()
    }

    #[tokio::test]
    async fn test_output_keeps_input_order() {
        let lines: Vec<String> = (1..=20)
            .map(|day| request(&format!("seen 01/{:02}/2023 (#{})", day, day)))
            .collect();
        let (_tx, rx) = watch::channel(false);
        let mut out = Vec::new();

        let summary = run_batch(engine(), lines, 4, rx, &mut out).await.unwrap();
        assert_eq!(summary.processed, 20);
        assert!(summary.is_successful());

        let text = String::from_utf8(out).unwrap();
        for (i, line) in text.lines().enumerate() {
            let response: AnonymizeResponse = serde_json::from_str(line).unwrap();
            assert_eq!(
                response.anonymized,
                format!("seen [Date_Anonymized] (#{})", i + 1)
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_line_becomes_error_object() {
        let lines = vec![request("01/02/2023"), "{not json".to_string(), String::new()];
        let (_tx, rx) = watch::channel(false);
        let mut out = Vec::new();

        let summary = run_batch(engine(), lines, 2, rx, &mut out).await.unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errors, 1);

        let text = String::from_utf8(out).unwrap();
        let second: serde_json::Value = serde_json::from_str(text.lines().nth(1).unwrap()).unwrap();
        assert!(second["error"].as_str().unwrap().contains("line 2"));
    }

    #[tokio::test]
    async fn test_shutdown_before_start_schedules_nothing() {
        let lines = vec![request("01/02/2023"), request("03/04/2023")];
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let mut out = Vec::new();

        let summary = run_batch(engine(), lines, 2, rx, &mut out).await.unwrap();
        assert_eq!(summary.processed, 0);
        assert!(summary.interrupted);
        assert!(out.is_empty());
    }
}
