//! Detected entity spans

use serde::{Deserialize, Serialize};

/// A region of text tagged with an entity type
///
/// `start..end` is a half-open byte range into the exact text the span was
/// computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub entity_type: String,
    /// Confidence score (0.0 - 1.0)
    pub score: f32,
}

impl EntitySpan {
    /// Create a new span
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, score: f32) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
            score: score.clamp(0.0, 1.0),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the span addresses a valid slice of `text`
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let a = EntitySpan::new("DATE", 0, 5, 0.9);
        let b = EntitySpan::new("DATE", 4, 8, 0.9);
        let c = EntitySpan::new("DATE", 5, 8, 0.9);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_validity() {
        let text = "Zoë";
        assert!(EntitySpan::new("PERSON", 0, 4, 1.0).is_valid_for(text));
        // splits the two-byte ë
        assert!(!EntitySpan::new("PERSON", 0, 3, 1.0).is_valid_for(text));
        assert!(!EntitySpan::new("PERSON", 2, 9, 1.0).is_valid_for(text));
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(EntitySpan::new("DATE", 0, 1, 3.0).score, 1.0);
    }
}
