//! Case-insensitive whole-word literal matching
//!
//! [`WordMatcher`] compiles a list of literals into one Aho-Corasick
//! automaton. Both the literals and the haystack are folded per character
//! with Unicode simple case folding, and an offset table maps folded
//! positions back to the original text so replacements always land on the
//! caller's bytes.
//!
//! Matches are whole words: the characters immediately around a match must
//! not be word characters in the sense of the `regex` crate's `\w`. Among
//! candidates the leftmost-longest non-overlapping set is kept.

use aho_corasick::{AhoCorasick, BuildError, MatchKind};

const NOT_BOUNDARY: usize = usize::MAX;

/// A whole-word match in the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMatch {
    pub start: usize,
    pub end: usize,
    /// Index of the matched literal in the list given to [`WordMatcher::new`]
    pub pattern: usize,
}

/// Multi-literal whole-word matcher
#[derive(Debug, Clone)]
pub struct WordMatcher {
    automaton: AhoCorasick,
    pattern_count: usize,
}

impl WordMatcher {
    /// Compile a matcher over `patterns`
    pub fn new<I, S>(patterns: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folded: Vec<String> = patterns
            .into_iter()
            .map(|pattern| fold_literal(pattern.as_ref()))
            .collect();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&folded)?;

        Ok(Self {
            automaton,
            pattern_count: folded.len(),
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Leftmost-longest whole-word matches, in text order
    pub fn find_words(&self, haystack: &str) -> Vec<WordMatch> {
        let folded = FoldedText::new(haystack);
        let mut candidates = Vec::new();

        for m in self.automaton.find_overlapping_iter(folded.text.as_str()) {
            if m.start() == m.end() {
                continue;
            }
            let (Some(start), Some(end)) = (folded.origin(m.start()), folded.origin(m.end())) else {
                continue;
            };
            if is_whole_word(haystack, start, end) {
                candidates.push(WordMatch {
                    start,
                    end,
                    pattern: m.pattern().as_usize(),
                });
            }
        }

        candidates.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.end.cmp(&a.end))
                .then(a.pattern.cmp(&b.pattern))
        });

        let mut selected = Vec::with_capacity(candidates.len());
        let mut cursor = 0;
        for candidate in candidates {
            if candidate.start >= cursor {
                cursor = candidate.end;
                selected.push(candidate);
            }
        }
        selected
    }

    /// Rewrite every match with the text returned by `replacement`
    ///
    /// Returns the rewritten text and the number of replacements made.
    pub fn replace_all<'a, F>(&self, haystack: &str, mut replacement: F) -> (String, usize)
    where
        F: FnMut(&WordMatch) -> &'a str,
    {
        let matches = self.find_words(haystack);
        if matches.is_empty() {
            return (haystack.to_string(), 0);
        }

        let mut output = String::with_capacity(haystack.len());
        let mut cursor = 0;
        for m in &matches {
            output.push_str(&haystack[cursor..m.start]);
            output.push_str(replacement(m));
            cursor = m.end;
        }
        output.push_str(&haystack[cursor..]);

        (output, matches.len())
    }
}

/// Whether `c` counts as part of a word
///
/// Alphanumerics, combining marks, connector punctuation and join controls,
/// matching `\w` in the `regex` crate.
pub fn is_word_char(c: char) -> bool {
    regex_syntax::is_word_character(c)
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn fold_literal(literal: &str) -> String {
    literal.chars().flat_map(fold_char).collect()
}

/// Lowercase mapping plus the simple case folds it does not cover
fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|lower| match lower {
        '\u{3c2}' => '\u{3c3}', // final sigma
        '\u{17f}' => 's', // long s
        '\u{b5}' => '\u{3bc}', // micro sign
        '\u{345}' | '\u{1fbe}' => '\u{3b9}', // iota subscript forms
        '\u{3d0}' => '\u{3b2}',
        '\u{3d1}' => '\u{3b8}',
        '\u{3d5}' => '\u{3c6}',
        '\u{3d6}' => '\u{3c0}',
        '\u{3f0}' => '\u{3ba}',
        '\u{3f1}' => '\u{3c1}',
        '\u{3f5}' => '\u{3b5}',
        '\u{1e9b}' => '\u{1e61}',
        other => other,
    })
}

/// Case-folded text with a map from folded byte offsets to original offsets
struct FoldedText {
    text: String,
    origin: Vec<usize>,
}

impl FoldedText {
    fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len() + 1);

        for (offset, ch) in source.char_indices() {
            let before = text.len();
            text.extend(fold_char(ch));
            origin.push(offset);
            // bytes inside a (possibly multi-char) folded expansion
            origin.extend(std::iter::repeat(NOT_BOUNDARY).take(text.len() - before - 1));
        }
        origin.push(source.len());

        Self { text, origin }
    }

    fn origin(&self, folded_offset: usize) -> Option<usize> {
        match self.origin.get(folded_offset) {
            Some(&offset) if offset != NOT_BOUNDARY => Some(offset),
            _ => None,
        }
    }
}
