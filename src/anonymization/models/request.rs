//! Request, response and outcome types

use super::{category::AnonymizationConfig, names::NameList};
use serde::{Deserialize, Serialize};

/// Transport-agnostic anonymization request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizeRequest {
    pub raw_data: String,
    #[serde(default)]
    pub names_list: NameList,
    #[serde(default)]
    pub options: AnonymizationConfig,
}

/// Transport-agnostic anonymization response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizeResponse {
    pub anonymized: String,
}

/// Why the pipeline returned the raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailSoftReason {
    /// The detector had no recognizer for the requested entity types
    NoRecognizers,
    /// The applier could not rewrite the document
    AnonymizationFailed,
}

/// Path a pipeline run took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// No category was enabled
    Disabled,
    /// Only email was enabled; detector skipped
    EmailFastPath,
    /// Full detection, restoration and name redaction
    Completed,
    /// Returned raw text after a soft failure
    FailSoft(FailSoftReason),
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionOutcome {
    pub text: String,
    pub route: Route,
    /// Spans applied by the anonymizer (or emails on the fast path)
    pub spans_applied: usize,
    pub protected_terms: usize,
    pub names_redacted: usize,
    /// Name entries or fallback batches that were skipped
    pub names_skipped: usize,
}

impl RedactionOutcome {
    /// Outcome that leaves the text untouched
    pub fn unchanged(text: impl Into<String>, route: Route) -> Self {
        Self {
            text: text.into(),
            route,
            spans_applied: 0,
            protected_terms: 0,
            names_redacted: 0,
            names_skipped: 0,
        }
    }

    pub fn is_fail_soft(&self) -> bool {
        matches!(self.route, Route::FailSoft(_))
    }
}

impl From<RedactionOutcome> for AnonymizeResponse {
    fn from(outcome: RedactionOutcome) -> Self {
        Self {
            anonymized: outcome.text,
        }
    }
}
