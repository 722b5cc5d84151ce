//! Protected-term extraction with memoization

use super::{TermCache, TermTagger, DEFAULT_PROTECTED_LABELS};
use crate::anonymization::models::ProtectedTermSet;
use crate::domain::TaggerError;
use std::collections::HashSet;
use std::sync::Arc;

/// Extracts the protected terms of a text through a tagger and a cache
#[derive(Clone)]
pub struct ProtectedTermExtractor {
    tagger: Arc<dyn TermTagger>,
    cache: TermCache,
    labels: HashSet<String>,
}

impl ProtectedTermExtractor {
    /// Create an extractor keeping the default labels
    pub fn new(tagger: Arc<dyn TermTagger>, cache: TermCache) -> Self {
        Self {
            tagger,
            cache,
            labels: DEFAULT_PROTECTED_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Replace the set of labels treated as protected
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.labels = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_uppercase())
            .collect();
        self
    }

    /// Swap the tagger, keeping the cache and labels
    pub fn with_tagger(mut self, tagger: Arc<dyn TermTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Swap the cache, e.g. to share one cache between engines
    pub fn with_cache(mut self, cache: TermCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &TermCache {
        &self.cache
    }

    /// Protected terms of `text`
    ///
    /// Tagger failures are logged and produce an empty set that is not
    /// cached, so the next call for the same text retries.
    pub fn extract(&self, text: &str) -> Arc<ProtectedTermSet> {
        match self.cache.get_or_try_compute(text, || self.compute(text)) {
            Ok(terms) => terms,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    text_len = text.len(),
                    "Protected-term tagging failed, continuing without protected terms"
                );
                Arc::new(ProtectedTermSet::new())
            }
        }
    }

    fn compute(&self, text: &str) -> Result<ProtectedTermSet, TaggerError> {
        let tagged = self.tagger.tag(text)?;
        let terms: ProtectedTermSet = tagged
            .into_iter()
            .filter(|term| self.labels.contains(&term.label))
            .map(|term| term.text)
            .collect();

        tracing::debug!(
            text_len = text.len(),
            protected_terms = terms.len(),
            "Extracted protected terms"
        );
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::terms::{NoopTagger, TaggedTerm};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTagger {
        calls: AtomicUsize,
    }

    impl TermTagger for CountingTagger {
        fn tag(&self, _text: &str) -> Result<Vec<TaggedTerm>, TaggerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                TaggedTerm::new("Warfarin", "DRUG"),
                TaggedTerm::new("Warfarin", "DRUG"),
                TaggedTerm::new("asthma", "DISEASE"),
                TaggedTerm::new("Boston", "GPE"),
            ])
        }
    }

    struct FailingTagger;

    impl TermTagger for FailingTagger {
        fn tag(&self, _text: &str) -> Result<Vec<TaggedTerm>, TaggerError> {
            Err(TaggerError::Failed("model unavailable".to_string()))
        }
    }

    #[test]
    fn test_filters_labels_and_deduplicates() {
        let tagger = Arc::new(CountingTagger {
            calls: AtomicUsize::new(0),
        });
        let extractor = ProtectedTermExtractor::new(tagger, TermCache::default());
        let terms = extractor.extract("any text");
        let collected: Vec<_> = terms.iter().collect();
        assert_eq!(collected, vec!["Warfarin", "asthma"]);
    }

    #[test]
    fn test_cache_hit_skips_tagger() {
        let tagger = Arc::new(CountingTagger {
            calls: AtomicUsize::new(0),
        });
        let extractor = ProtectedTermExtractor::new(tagger.clone(), TermCache::default());

        let first = extractor.extract("same text");
        let second = extractor.extract("same text");
        assert_eq!(first, second);
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 1);

        extractor.extract("other text");
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_custom_labels() {
        let tagger = Arc::new(CountingTagger {
            calls: AtomicUsize::new(0),
        });
        let extractor =
            ProtectedTermExtractor::new(tagger, TermCache::default()).with_labels(["gpe"]);
        let terms = extractor.extract("x");
        assert_eq!(terms.iter().collect::<Vec<_>>(), vec!["Boston"]);
    }

    #[test]
    fn test_failure_yields_empty_set() {
        let extractor = ProtectedTermExtractor::new(Arc::new(FailingTagger), TermCache::default());
        assert!(extractor.extract("text").is_empty());
        assert!(!extractor.cache().contains("text"));
    }

    #[test]
    fn test_noop_tagger() {
        let extractor = ProtectedTermExtractor::new(Arc::new(NoopTagger), TermCache::default());
        assert!(extractor.extract("Warfarin").is_empty());
    }
}
