// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentence splitting and claim normalization.

use std::collections::{HashMap, HashSet};

/// A sentence and its byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split text into sentences.
///
/// A sentence ends at a newline, or at `.`, `!` or `?` followed by
/// whitespace or the end of text. Decimal points and URLs stay intact.
pub fn split(text: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let boundary = match c {
            '\n' => Some(idx),
            '.' | '!' | '?' => match chars.peek() {
                None => Some(idx + c.len_utf8()),
                Some((_, next)) if next.is_whitespace() => Some(idx + c.len_utf8()),
                _ => None,
            },
            _ => None,
        };
        if let Some(end) = boundary {
            push_trimmed(text, start, end, &mut out);
            start = end;
        }
    }
    push_trimmed(text, start, text.len(), &mut out);
    out
}

fn push_trimmed<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    let raw = &text[start..end];
    let lead = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        out.push(Sentence {
            text: trimmed,
            start: start + lead,
            end: start + lead + trimmed.len(),
        });
    }
}

/// The sentence containing byte offset `pos`.
pub fn containing<'a>(sentences: &[Sentence<'a>], pos: usize) -> Option<Sentence<'a>> {
    sentences
        .iter()
        .find(|s| pos >= s.start && pos < s.end)
        .copied()
}

/// A sentence reduced to its affirmative token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub tokens: Vec<String>,
    pub negated: bool,
}

/// Turns sentences into comparable claims.
#[derive(Debug, Clone, Default)]
pub struct ClaimNormalizer {
    negation_words: HashSet<String>,
    negated_forms: HashMap<String, String>,
}

impl ClaimNormalizer {
    pub fn new(
        negation_words: impl IntoIterator<Item = String>,
        negated_forms: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            negation_words: negation_words
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            negated_forms: negated_forms
                .into_iter()
                .map(|(n, a)| (n.to_lowercase(), a.to_lowercase()))
                .collect(),
        }
    }

    /// Lower-case, tokenize, drop negation words and expand negated contractions.
    pub fn claim(&self, sentence: &str) -> Claim {
        let mut tokens = Vec::new();
        let mut negated = false;

        let lowered = sentence.to_lowercase().replace('\u{2019}', "'");
        for token in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
        {
            if let Some(affirmative) = self.negated_forms.get(token) {
                negated = true;
                tokens.push(affirmative.clone());
            } else if self.negation_words.contains(token) {
                negated = true;
            } else {
                tokens.push(token.to_string());
            }
        }

        Claim { tokens, negated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminators_and_newlines() {
        let s: Vec<&str> = split("One. Two!\nThree? four")
            .iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(s, vec!["One.", "Two!", "Three?", "four"]);
    }

    #[test]
    fn decimals_and_urls_do_not_split() {
        let s = split("Version 3.5 ships per https://example.com/notes today.");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn offsets_point_into_source() {
        let text = "  First one.   Second one.";
        for s in split(text) {
            assert_eq!(&text[s.start..s.end], s.text);
        }
    }

    #[test]
    fn containing_finds_sentence() {
        let text = "Alpha. Beta gamma.";
        let sentences = split(text);
        let pos = text.find("gamma").unwrap();
        assert_eq!(containing(&sentences, pos).unwrap().text, "Beta gamma.");
    }

    #[test]
    fn claims_strip_negation() {
        let n = ClaimNormalizer::new(
            vec!["not".to_string()],
            vec![("isn't".to_string(), "is".to_string())],
        );
        let a = n.claim("The cache is warm.");
        let b = n.claim("The cache isn't warm.");
        let c = n.claim("The cache is NOT warm");
        assert!(!a.negated);
        assert!(b.negated && c.negated);
        assert_eq!(a.tokens, b.tokens);
        assert_eq!(a.tokens, c.tokens);
    }

    #[test]
    fn curly_apostrophes_are_normalized() {
        let n = ClaimNormalizer::new(
            Vec::new(),
            vec![("doesn't".to_string(), "does".to_string())],
        );
        let claim = n.claim("It doesn\u{2019}t scale");
        assert!(claim.negated);
        assert_eq!(claim.tokens, vec!["it", "does", "scale"]);
    }
}
