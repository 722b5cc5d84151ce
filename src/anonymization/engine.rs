//! Main anonymization engine
//!
//! [`AnonymizationEngine`] sequences the redaction passes over one document:
//!
//! 1. select entity types and tokens for the enabled categories
//! 2. extract protected terms (memoized per text)
//! 3. detect spans and carve protected terms out of them
//! 4. rewrite the spans with their category tokens
//! 5. restore the original spelling of protected terms
//! 6. redact the caller's literal names
//!
//! A request with only email enabled skips steps 2 to 6 and uses a single
//! regular expression. Missing recognizers and applier failures return the
//! raw text; any other detector failure is surfaced as
//! [`RedactError::Detector`].
//!
//! # Examples
//!
//! ```no_run
//! use medredact::anonymization::{AnonymizationEngine, AnonymizationSettings};
//! use medredact::anonymization::models::{AnonymizationConfig, NameList, PiiCategory};
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(&AnonymizationSettings::default())?;
//! let options = AnonymizationConfig::with_categories(&[PiiCategory::Date, PiiCategory::Name]);
//! let names = NameList::from(vec!["John Doe"]);
//!
//! let outcome = engine.anonymize("John Doe seen on 01/02/2023", &names, &options)?;
//! assert_eq!(outcome.text, "[Name_Anonymized] seen on [Date_Anonymized]");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::{Anonymizer, SpanReplacer},
    config::AnonymizationSettings,
    detector::{patterns::PatternRegistry, regex::PatternDetector, SpanDetector},
    models::{
        AnonymizationConfig, AnonymizeRequest, AnonymizeResponse, FailSoftReason, NameList,
        PiiCategory, RedactionOutcome, Route,
    },
    names::LiteralNameRedactor,
    restore::ProtectedTermRestorer,
    selector::CategorySelector,
    terms::{LexiconTagger, NoopTagger, ProtectedTermExtractor, TermCache, TermTagger},
};
use crate::domain::{RedactError, Result};
use crate::{log_fail_soft, log_redaction_complete};
use anyhow::Context;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;

/// Pattern used when email is the only enabled category
const EMAIL_FAST_PATH_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Main anonymization engine
///
/// Thread-safe; share it across threads or tasks behind an `Arc`. The term
/// cache is the only shared mutable state.
pub struct AnonymizationEngine {
    language: String,
    detector: Arc<dyn SpanDetector>,
    anonymizer: Arc<dyn Anonymizer>,
    extractor: ProtectedTermExtractor,
    name_redactor: LiteralNameRedactor,
    email_pattern: Regex,
}

impl AnonymizationEngine {
    /// Create an engine with the default collaborators described by `settings`
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the pattern library
    /// or lexicon cannot be loaded.
    pub fn new(settings: &AnonymizationSettings) -> anyhow::Result<Self> {
        settings
            .validate()
            .context("Invalid anonymization configuration")?;

        let registry = match settings.detector.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::default_patterns()?,
        };
        let detector = PatternDetector::with_registry(registry)
            .with_confidence_threshold(settings.detector.confidence_threshold)
            .with_language(settings.language.as_str());

        let tagger: Arc<dyn TermTagger> = match settings.protected_terms.lexicon {
            Some(ref path) => Arc::new(LexiconTagger::from_file(path)?),
            None => Arc::new(NoopTagger),
        };
        let cache = TermCache::new(settings.cache.max_bytes, settings.cache.time_to_idle());
        let extractor = ProtectedTermExtractor::new(tagger, cache)
            .with_labels(&settings.protected_terms.labels);

        let email_pattern =
            Regex::new(EMAIL_FAST_PATH_PATTERN).context("Failed to compile email pattern")?;

        tracing::debug!(
            language = %settings.language,
            custom_patterns = settings.detector.pattern_library.is_some(),
            lexicon = settings.protected_terms.lexicon.is_some(),
            cache_max_bytes = settings.cache.max_bytes,
            "Anonymization engine created"
        );

        Ok(Self {
            language: settings.language.clone(),
            detector: Arc::new(detector),
            anonymizer: Arc::new(SpanReplacer::new()),
            extractor,
            name_redactor: LiteralNameRedactor::new(),
            email_pattern,
        })
    }

    /// Replace the span detector
    pub fn with_detector(mut self, detector: Arc<dyn SpanDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the protected-term tagger
    pub fn with_tagger(mut self, tagger: Arc<dyn TermTagger>) -> Self {
        self.extractor = self.extractor.with_tagger(tagger);
        self
    }

    /// Replace the anonymization applier
    pub fn with_anonymizer(mut self, anonymizer: Arc<dyn Anonymizer>) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    /// Replace the protected-term cache
    pub fn with_cache(mut self, cache: TermCache) -> Self {
        self.extractor = self.extractor.with_cache(cache);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn term_cache(&self) -> &TermCache {
        self.extractor.cache()
    }

    /// Redact the enabled categories and the listed names from `raw`
    ///
    /// # Errors
    ///
    /// Returns [`RedactError::Detector`] when the detector fails for any
    /// reason other than missing recognizers. Every other failure falls back
    /// to the raw text.
    pub fn anonymize(
        &self,
        raw: &str,
        names: &NameList,
        config: &AnonymizationConfig,
    ) -> Result<RedactionOutcome> {
        let started = Instant::now();
        let selection = CategorySelector::select(config);

        if selection.is_empty() {
            tracing::debug!(text_len = raw.len(), "No category enabled, text unchanged");
            return Ok(RedactionOutcome::unchanged(raw, Route::Disabled));
        }

        if selection.is_email_only() {
            let outcome = self.redact_emails(raw);
            log_redaction_complete!(&outcome, started.elapsed());
            return Ok(outcome);
        }

        let protected_terms = self.extractor.extract(raw);

        let spans = match self
            .detector
            .detect(raw, &self.language, &selection.entity_types)
        {
            Ok(spans) => spans,
            Err(e) if e.is_soft() => {
                log_fail_soft!(FailSoftReason::NoRecognizers, &e);
                return Ok(RedactionOutcome::unchanged(
                    raw,
                    Route::FailSoft(FailSoftReason::NoRecognizers),
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, text_len = raw.len(), "Span detection failed");
                return Err(RedactError::Detector(e));
            }
        };
        tracing::debug!(spans = spans.len(), "Spans detected");

        let restorer = ProtectedTermRestorer::new(&protected_terms);
        let spans = restorer.shield(raw, spans);

        let anonymized = if spans.is_empty() {
            raw.to_string()
        } else {
            match self.anonymizer.apply(raw, &spans, &selection.tokens) {
                Ok(text) => text,
                Err(e) => {
                    log_fail_soft!(FailSoftReason::AnonymizationFailed, &e);
                    return Ok(RedactionOutcome::unchanged(
                        raw,
                        Route::FailSoft(FailSoftReason::AnonymizationFailed),
                    ));
                }
            }
        };

        let mut outcome = RedactionOutcome {
            text: restorer.restore(&anonymized),
            route: Route::Completed,
            spans_applied: spans.len(),
            protected_terms: protected_terms.len(),
            names_redacted: 0,
            names_skipped: 0,
        };

        if selection.includes(PiiCategory::Name) && !names.is_empty() {
            let redaction = self.name_redactor.redact(
                &outcome.text,
                names,
                &protected_terms,
                PiiCategory::Name.token(),
            );
            outcome.text = redaction.text;
            outcome.names_redacted = redaction.redacted;
            outcome.names_skipped = redaction.skipped;
        }

        log_redaction_complete!(&outcome, started.elapsed());
        Ok(outcome)
    }

    /// Transport-shaped entry point
    pub fn handle(&self, request: &AnonymizeRequest) -> Result<AnonymizeResponse> {
        self.anonymize(&request.raw_data, &request.names_list, &request.options)
            .map(AnonymizeResponse::from)
    }

    fn redact_emails(&self, raw: &str) -> RedactionOutcome {
        let mut count = 0;
        let text = self
            .email_pattern
            .replace_all(raw, |_: &regex::Captures<'_>| {
                count += 1;
                PiiCategory::Email.token()
            })
            .into_owned();

        RedactionOutcome {
            text,
            route: Route::EmailFastPath,
            spans_applied: count,
            protected_terms: 0,
            names_redacted: 0,
            names_skipped: 0,
        }
    }
}

impl std::fmt::Debug for AnonymizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizationEngine")
            .field("language", &self.language)
            .field("term_cache", self.extractor.cache())
            .field("name_redactor", &self.name_redactor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::EntitySpan;
    use crate::anonymization::selector::TokenMap;
    use crate::domain::{AnonymizeError, DetectorError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDetector {
        calls: AtomicUsize,
        result: std::result::Result<Vec<EntitySpan>, DetectorError>,
    }

    impl CountingDetector {
        fn returning(result: std::result::Result<Vec<EntitySpan>, DetectorError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result,
            })
        }
    }

    impl SpanDetector for CountingDetector {
        fn detect(
            &self,
            _text: &str,
            _language: &str,
            _entity_types: &[&str],
        ) -> std::result::Result<Vec<EntitySpan>, DetectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct FailingAnonymizer;

    impl Anonymizer for FailingAnonymizer {
        fn apply(
            &self,
            _text: &str,
            _spans: &[EntitySpan],
            _tokens: &TokenMap,
        ) -> std::result::Result<String, AnonymizeError> {
            Err(AnonymizeError::AnonymizationFailed("boom".to_string()))
        }
    }

    fn engine() -> AnonymizationEngine {
        AnonymizationEngine::new(&AnonymizationSettings::default()).unwrap()
    }

    fn lexicon_engine() -> AnonymizationEngine {
        let tagger = LexiconTagger::from_toml("[terms]\nDRUG = [\"Warfarin\"]\n").unwrap();
        engine().with_tagger(Arc::new(tagger))
    }

    #[test]
    fn test_scenario_call_with_name_phone_date() {
        let options = AnonymizationConfig::with_categories(&[
            PiiCategory::Date,
            PiiCategory::Name,
            PiiCategory::Phone,
        ]);
        let outcome = engine()
            .anonymize(
                "Call John Doe at 555-123-4567 on 01/02/2023",
                &NameList::from(vec!["John Doe"]),
                &options,
            )
            .unwrap();
        assert_eq!(
            outcome.text,
            "Call [Name_Anonymized] at [Phone_Anonymized] on [Date_Anonymized]"
        );
        assert_eq!(outcome.route, Route::Completed);
        assert_eq!(outcome.names_redacted, 1);
    }

    #[test]
    fn test_email_fast_path_skips_detector() {
        let detector = CountingDetector::returning(Ok(Vec::new()));
        let engine = engine().with_detector(detector.clone());
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Email]);

        let outcome = engine
            .anonymize("reach me at a.b@example.com today", &NameList::new(), &options)
            .unwrap();
        assert_eq!(outcome.text, "reach me at [Email_Anonymized] today");
        assert_eq!(outcome.route, Route::EmailFastPath);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.term_cache().entry_count(), 0);
    }

    #[test]
    fn test_nothing_enabled_is_identity() {
        let detector = CountingDetector::returning(Ok(Vec::new()));
        let engine = engine().with_detector(detector.clone());
        let outcome = engine
            .anonymize(
                "John Doe 555-123-4567",
                &NameList::from(vec!["John Doe"]),
                &AnonymizationConfig::default(),
            )
            .unwrap();
        assert_eq!(outcome.text, "John Doe 555-123-4567");
        assert_eq!(outcome.route, Route::Disabled);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_recognizers_fails_soft() {
        let detector = CountingDetector::returning(Err(DetectorError::NoRecognizersAvailable {
            language: "en".to_string(),
            requested: vec!["DATE".to_string()],
        }));
        let engine = engine().with_detector(detector);
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Date, PiiCategory::Name]);

        let outcome = engine
            .anonymize("Jane on 01/02/2023", &NameList::from(vec!["Jane"]), &options)
            .unwrap();
        assert_eq!(outcome.text, "Jane on 01/02/2023");
        assert_eq!(outcome.route, Route::FailSoft(FailSoftReason::NoRecognizers));
    }

    #[test]
    fn test_other_detector_error_is_fatal() {
        let detector =
            CountingDetector::returning(Err(DetectorError::Failed("model crashed".to_string())));
        let engine = engine().with_detector(detector);
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Date]);

        let err = engine
            .anonymize("01/02/2023", &NameList::new(), &options)
            .unwrap_err();
        assert!(matches!(err, RedactError::Detector(DetectorError::Failed(_))));
    }

    #[test]
    fn test_applier_failure_fails_soft() {
        let engine = engine().with_anonymizer(Arc::new(FailingAnonymizer));
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Date, PiiCategory::Name]);

        let outcome = engine
            .anonymize("Jane on 01/02/2023", &NameList::from(vec!["Jane"]), &options)
            .unwrap();
        assert_eq!(outcome.text, "Jane on 01/02/2023");
        assert_eq!(
            outcome.route,
            Route::FailSoft(FailSoftReason::AnonymizationFailed)
        );
    }

    #[test]
    fn test_no_spans_skips_applier() {
        let engine = engine().with_anonymizer(Arc::new(FailingAnonymizer));
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Date, PiiCategory::Name]);

        let outcome = engine
            .anonymize("Jane came back", &NameList::from(vec!["Jane"]), &options)
            .unwrap();
        assert_eq!(outcome.text, "[Name_Anonymized] came back");
        assert_eq!(outcome.route, Route::Completed);
    }

    #[test]
    fn test_protected_name_never_redacted() {
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Name, PiiCategory::Date]);
        let outcome = lexicon_engine()
            .anonymize(
                "Warfarin started for Jane on 01/02/2023",
                &NameList::from(vec!["Warfarin", "Jane"]),
                &options,
            )
            .unwrap();
        assert_eq!(
            outcome.text,
            "Warfarin started for [Name_Anonymized] on [Date_Anonymized]"
        );
        assert_eq!(outcome.protected_terms, 1);
    }

    #[test]
    fn test_protected_term_carved_from_span() {
        let text = "Dr. Warfarin reviewed the chart";
        let start = text.find("Warfarin").unwrap();
        let detector = CountingDetector::returning(Ok(vec![EntitySpan::new(
            "PERSON",
            0,
            start + "Warfarin".len(),
            0.6,
        )]));
        let engine = lexicon_engine().with_detector(detector);
        let options = AnonymizationConfig::with_categories(&[PiiCategory::Name]);

        let outcome = engine.anonymize(text, &NameList::new(), &options).unwrap();
        assert_eq!(outcome.text, "[Name_Anonymized]. Warfarin reviewed the chart");
    }

    #[test]
    fn test_handle_wraps_response() {
        let request: AnonymizeRequest = serde_json::from_str(
            r#"{"raw_data": "mail a@b.com", "names_list": [], "options": {"email": true}}"#,
        )
        .unwrap();
        let response = engine().handle(&request).unwrap();
        assert_eq!(response.anonymized, "mail [Email_Anonymized]");
    }
}
