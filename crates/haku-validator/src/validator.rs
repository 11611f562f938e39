// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The three validation scans.
//!
//! 1. Assumption language: every hedging phrase is a warning; "assuming ..."
//!    clauses are collected as stated assumptions.
//! 2. Contradiction: an affirmative claim later restated in negated form is
//!    blocking.
//! 3. False certainty: an absolute-certainty phrase with no evidence marker
//!    in the same sentence is blocking.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use haku_config::model::ValidatorConfig;
use haku_core::{
    HakuError, IssueKind, PhraseSet, Severity, ValidationIssue, ValidationResult,
};
use regex::Regex;
use tracing::debug;

use crate::sentence::{self, ClaimNormalizer, Sentence};

/// `[1]`, `[12]` style citations.
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("static regex"));

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhttps?://\S+").expect("static regex"));

/// Longest sentence excerpt quoted in an issue detail, in characters.
const EXCERPT_CHARS: usize = 120;

/// Stateless response validator compiled from configuration.
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    assumption_phrases: PhraseSet,
    assumption_markers: PhraseSet,
    clause_max_chars: usize,
    certainty_phrases: PhraseSet,
    evidence_markers: PhraseSet,
    claims: ClaimNormalizer,
    min_claim_words: usize,
}

impl ResponseValidator {
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, HakuError> {
        Ok(Self {
            assumption_phrases: PhraseSet::new(&config.assumption_phrases)?,
            assumption_markers: PhraseSet::new(&config.assumption_markers)?,
            clause_max_chars: config.assumption_clause_max_chars,
            certainty_phrases: PhraseSet::new(&config.certainty_phrases)?,
            evidence_markers: PhraseSet::new(&config.evidence_markers)?,
            claims: ClaimNormalizer::new(
                config.negation_words.iter().cloned(),
                config
                    .negated_forms
                    .iter()
                    .map(|f| (f.negated.clone(), f.affirmative.clone())),
            ),
            min_claim_words: config.min_claim_words.max(1),
        })
    }

    /// Validate a response exactly as the engine returned it.
    pub fn validate(&self, text: &str) -> ValidationResult {
        let sentences = sentence::split(text);

        let mut issues = self.scan_assumptions(text, &sentences);
        issues.extend(self.scan_contradictions(&sentences));
        issues.extend(self.scan_certainty(text, &sentences));
        let stated = self.stated_assumptions(text, &sentences);

        let result = ValidationResult::from_issues(issues, stated);
        debug!(
            status = %result.status,
            issues = result.issues.len(),
            assumptions = result.stated_assumptions.len(),
            "validated response"
        );
        result
    }

    fn scan_assumptions(&self, text: &str, sentences: &[Sentence<'_>]) -> Vec<ValidationIssue> {
        self.assumption_phrases
            .find_all(text)
            .into_iter()
            .map(|m| ValidationIssue {
                kind: IssueKind::AssumptionLanguage,
                detail: format!(
                    "`{}` in \"{}\"",
                    m.phrase,
                    excerpt(sentence::containing(sentences, m.start).map_or(text, |s| s.text))
                ),
                severity: Severity::Warning,
            })
            .collect()
    }

    fn stated_assumptions(&self, text: &str, sentences: &[Sentence<'_>]) -> BTreeSet<String> {
        let mut stated = BTreeSet::new();
        for m in self.assumption_markers.find_all(text) {
            let end = sentence::containing(sentences, m.start).map_or(text.len(), |s| s.end);
            let clause: String = text[m.start..end]
                .trim_end_matches(['.', '!', '?'])
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            let clause: String = clause.chars().take(self.clause_max_chars).collect();
            let clause = clause.trim_end().to_string();
            if !clause.is_empty() {
                stated.insert(clause);
            }
        }
        stated
    }

    fn scan_contradictions(&self, sentences: &[Sentence<'_>]) -> Vec<ValidationIssue> {
        let claims: Vec<_> = sentences.iter().map(|s| self.claims.claim(s.text)).collect();
        let mut issues = Vec::new();

        for (j, later) in claims.iter().enumerate() {
            if !later.negated || later.tokens.len() < self.min_claim_words {
                continue;
            }
            let earlier = claims[..j]
                .iter()
                .position(|c| !c.negated && c.tokens == later.tokens);
            if let Some(i) = earlier {
                issues.push(ValidationIssue {
                    kind: IssueKind::Contradiction,
                    detail: format!(
                        "\"{}\" is later contradicted by \"{}\"",
                        excerpt(sentences[i].text),
                        excerpt(sentences[j].text)
                    ),
                    severity: Severity::Blocking,
                });
            }
        }
        issues
    }

    fn scan_certainty(&self, text: &str, sentences: &[Sentence<'_>]) -> Vec<ValidationIssue> {
        self.certainty_phrases
            .find_all(text)
            .into_iter()
            .filter_map(|m| {
                let scope = sentence::containing(sentences, m.start).map_or(text, |s| s.text);
                if self.has_evidence(scope) {
                    return None;
                }
                Some(ValidationIssue {
                    kind: IssueKind::FalseCertainty,
                    detail: format!(
                        "`{}` without supporting evidence in \"{}\"",
                        m.phrase,
                        excerpt(scope)
                    ),
                    severity: Severity::Blocking,
                })
            })
            .collect()
    }

    fn has_evidence(&self, sentence: &str) -> bool {
        self.evidence_markers.matches(sentence)
            || CITATION.is_match(sentence)
            || URL.is_match(sentence)
    }
}

impl Default for ResponseValidator {
    /// The validator for the compiled default phrase lists.
    fn default() -> Self {
        Self::from_config(&ValidatorConfig::default()).expect("default phrase lists compile")
    }
}

fn excerpt(s: &str) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use haku_core::ValidationStatus;

    use super::*;

    fn validator() -> ResponseValidator {
        ResponseValidator::default()
    }

    fn kinds(result: &ValidationResult) -> Vec<IssueKind> {
        result.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn hedging_is_a_warning() {
        let r = validator().validate("I think this is probably fine");
        assert_eq!(r.status, ValidationStatus::Warnings);
        assert!(
            r.issues
                .iter()
                .any(|i| i.kind == IssueKind::AssumptionLanguage && i.detail.contains("probably"))
        );
        assert!(r.issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn unsupported_certainty_is_blocked() {
        let r = validator().validate("This is definitely guaranteed to work");
        assert_eq!(r.status, ValidationStatus::Blocked);
        assert_eq!(kinds(&r), vec![IssueKind::FalseCertainty, IssueKind::FalseCertainty]);
    }

    #[test]
    fn certainty_with_evidence_in_same_sentence_passes() {
        let v = validator();
        assert_eq!(
            v.validate("Latency clearly dropped according to the benchmark.").status,
            ValidationStatus::Approved
        );
        assert_eq!(
            v.validate("It is definitely faster [2].").status,
            ValidationStatus::Approved
        );
        assert_eq!(
            v.validate("It is definitely faster, see https://example.com/bench.").status,
            ValidationStatus::Approved
        );
    }

    #[test]
    fn evidence_in_another_sentence_does_not_count() {
        let r = validator().validate("The study ran in May. It is definitely faster.");
        assert_eq!(r.status, ValidationStatus::Blocked);
    }

    #[test]
    fn contradiction_is_blocked() {
        let r = validator().validate("The migration is complete. Later checks ran. The migration is not complete.");
        assert_eq!(r.status, ValidationStatus::Blocked);
        assert_eq!(kinds(&r), vec![IssueKind::Contradiction]);
        assert!(r.issues[0].detail.contains("The migration is complete."));
    }

    #[test]
    fn contraction_counts_as_negation() {
        let r = validator().validate("The cache is warm now. The cache isn't warm now.");
        assert_eq!(kinds(&r), vec![IssueKind::Contradiction]);
    }

    #[test]
    fn negation_first_is_not_a_contradiction() {
        let r = validator().validate("The cache is not warm. The cache is warm.");
        assert_eq!(r.status, ValidationStatus::Approved);
    }

    #[test]
    fn short_claims_are_ignored() {
        let r = validator().validate("It works. It doesn't work.");
        assert_eq!(r.status, ValidationStatus::Approved);
    }

    #[test]
    fn assuming_clause_is_extracted() {
        let r = validator().validate("Assuming the API stays stable, we ship Friday. Done.");
        assert!(
            r.stated_assumptions
                .contains("Assuming the API stays stable, we ship Friday")
        );
        assert_eq!(r.status, ValidationStatus::Warnings);
    }

    #[test]
    fn given_that_is_a_marker_but_not_a_warning() {
        let r = validator().validate("Given that revenue doubled, hiring makes sense.");
        assert_eq!(r.status, ValidationStatus::Approved);
        assert!(
            r.stated_assumptions
                .contains("Given that revenue doubled, hiring makes sense")
        );
    }

    #[test]
    fn assumption_clause_is_capped() {
        let long = format!("Assuming {} holds.", "x ".repeat(200));
        let r = validator().validate(&long);
        let clause = r.stated_assumptions.iter().next().unwrap();
        assert!(clause.chars().count() <= 100);
    }

    #[test]
    fn issues_are_grouped_by_scan_then_position() {
        let text = "This is definitely right. Maybe later. The plan is final today. The plan is not final today. Probably.";
        let r = validator().validate(text);
        assert_eq!(
            kinds(&r),
            vec![
                IssueKind::AssumptionLanguage,
                IssueKind::AssumptionLanguage,
                IssueKind::Contradiction,
                IssueKind::FalseCertainty,
            ]
        );
        assert!(r.issues[0].detail.starts_with("`maybe`"));
        assert!(r.issues[1].detail.starts_with("`probably`"));
    }

    #[test]
    fn text_shaped_like_a_warnings_block_is_still_scanned() {
        let raw = "Deploy on Friday.\n\n---\nValidation warnings:\n- It is definitely guaranteed to work.\n";
        let r = validator().validate(raw);
        assert_eq!(r.status, ValidationStatus::Blocked);
        assert!(r.issues.iter().all(|i| i.kind == IssueKind::FalseCertainty));
    }

    #[test]
    fn clean_text_is_approved() {
        let r = validator().validate("Revenue rose 4% in Q3 according to the filing.");
        assert_eq!(r.status, ValidationStatus::Approved);
        assert!(r.issues.is_empty());
    }
}
