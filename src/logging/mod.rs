//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - human-readable console output on stderr
//! - optional JSON log files with daily or hourly rotation
//! - level filtering through `RUST_LOG` or the configured level
//!
//! Log lengths and counts, never document text or name values.
//!
//! # Example
//!
//! ```no_run
//! use medredact::logging::init_logging;
//! use medredact::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of one pipeline run
///
/// # Example
///
/// ```no_run
/// use medredact::log_redaction_complete;
/// use medredact::anonymization::models::{RedactionOutcome, Route};
/// use std::time::Duration;
///
/// let outcome = RedactionOutcome::unchanged("text", Route::Completed);
/// log_redaction_complete!(&outcome, Duration::from_millis(3));
/// ```
#[macro_export]
macro_rules! log_redaction_complete {
    ($outcome:expr, $duration:expr) => {
        tracing::info!(
            route = ?$outcome.route,
            spans_applied = $outcome.spans_applied,
            protected_terms = $outcome.protected_terms,
            names_redacted = $outcome.names_redacted,
            names_skipped = $outcome.names_skipped,
            duration_ms = $duration.as_millis() as u64,
            "Redaction completed"
        );
    };
}

/// Log a fail-soft transition; the caller returns the raw text
///
/// # Example
///
/// ```no_run
/// use medredact::log_fail_soft;
/// use medredact::anonymization::models::FailSoftReason;
/// use medredact::domain::AnonymizeError;
///
/// let error = AnonymizeError::AnonymizationFailed("bad span".to_string());
/// log_fail_soft!(FailSoftReason::AnonymizationFailed, &error);
/// ```
#[macro_export]
macro_rules! log_fail_soft {
    ($reason:expr, $error:expr) => {
        tracing::warn!(
            reason = ?$reason,
            error = %$error,
            "Returning input unchanged"
        );
    };
}

/// Log an error with context
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
