// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phrase matching shared by the classifiers and the response validator.
//!
//! Phrases are matched case-insensitively on word boundaries. Internal
//! whitespace in a phrase matches any run of whitespace in the text, so
//! `"should we"` matches `"Should\n  we"`. A phrase that starts or ends with
//! a non-word character (`"100% certain"`, `"[n]"`) is not anchored on that
//! side.

use regex::{Regex, RegexBuilder};

use crate::error::HakuError;

/// Lower-case the text and collapse every whitespace run to one space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the regex source for one phrase.
pub fn phrase_pattern(phrase: &str) -> String {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let trimmed = phrase.trim();
    let lead = if trimmed.chars().next().is_some_and(is_word) {
        r"\b"
    } else {
        ""
    };
    let trail = if trimmed.chars().last().is_some_and(is_word) {
        r"\b"
    } else {
        ""
    };
    format!("{lead}{body}{trail}")
}

/// One phrase occurrence in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch<'a> {
    /// The configured phrase that matched.
    pub phrase: &'a str,
    /// Byte offset of the match in the searched text.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    phrase: String,
    regex: Regex,
}

/// An ordered, compiled set of phrases.
#[derive(Debug, Clone, Default)]
pub struct PhraseSet {
    entries: Vec<Entry>,
}

impl PhraseSet {
    /// Compile a phrase list. Blank phrases are skipped.
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Result<Self, HakuError> {
        let mut entries = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let phrase = phrase.as_ref().trim();
            if phrase.is_empty() {
                continue;
            }
            let regex = RegexBuilder::new(&phrase_pattern(phrase))
                .case_insensitive(true)
                .build()
                .map_err(|e| HakuError::Config(format!("phrase `{phrase}`: {e}")))?;
            entries.push(Entry {
                phrase: phrase.to_string(),
                regex,
            });
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any phrase occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.regex.is_match(text))
    }

    /// The first phrase, in list order, that occurs in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.regex.is_match(text))
            .map(|e| e.phrase.as_str())
    }

    /// Every occurrence of every phrase, ordered by position.
    ///
    /// Ties at the same offset keep list order.
    pub fn find_all(&self, text: &str) -> Vec<PhraseMatch<'_>> {
        let mut found: Vec<(usize, PhraseMatch<'_>)> = Vec::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            for m in entry.regex.find_iter(text) {
                found.push((
                    idx,
                    PhraseMatch {
                        phrase: &entry.phrase,
                        start: m.start(),
                        end: m.end(),
                    },
                ));
            }
        }
        found.sort_by_key(|(idx, m)| (m.start, *idx));
        found.into_iter().map(|(_, m)| m).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses() {
        assert_eq!(normalize("  Should\tWE\n\nbuild  it "), "should we build it");
    }

    #[test]
    fn phrases_respect_word_boundaries() {
        let set = PhraseSet::new(&["plan"]).unwrap();
        assert!(set.matches("we need a plan."));
        assert!(!set.matches("the planet is round"));
        assert!(!set.matches("airplane"));
    }

    #[test]
    fn multi_word_phrase_spans_whitespace() {
        let set = PhraseSet::new(&["should we"]).unwrap();
        assert!(set.matches("Should\n   we go?"));
    }

    #[test]
    fn symbol_edges_are_not_anchored() {
        let set = PhraseSet::new(&["100% certain"]).unwrap();
        assert!(set.matches("I am 100% certain of it"));
        assert_eq!(phrase_pattern("100% certain"), r"\b100%\s+certain\b");
        assert_eq!(phrase_pattern("[n]"), r"\[n\]");
    }

    #[test]
    fn first_match_follows_list_order() {
        let set = PhraseSet::new(&["review", "check"]).unwrap();
        assert_eq!(set.first_match("check and review"), Some("review"));
        assert_eq!(set.first_match("nothing here"), None);
    }

    #[test]
    fn find_all_orders_by_position() {
        let set = PhraseSet::new(&["maybe", "probably"]).unwrap();
        let found = set.find_all("Probably yes, maybe no, probably.");
        let phrases: Vec<&str> = found.iter().map(|m| m.phrase).collect();
        assert_eq!(phrases, vec!["probably", "maybe", "probably"]);
        assert_eq!(found[0].start, 0);
    }

    #[test]
    fn blank_phrases_are_skipped() {
        let set = PhraseSet::new(&["", "  ", "ok"]).unwrap();
        assert_eq!(set.len(), 1);
    }
}
