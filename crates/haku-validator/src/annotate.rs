// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-visible rendering of validation outcomes.
//!
//! Approved text passes through untouched. Warned text gets exactly one
//! warnings block appended. Blocked text is replaced by a refusal; the
//! original only travels to the audit sink.
//!
//! Rendering always starts from the engine's original text, never from an
//! earlier rendering, so a warnings block cannot be doubled.

use haku_core::{ValidationResult, ValidationStatus};

/// Opens the appended warnings block.
pub const WARNINGS_HEADER: &str = "\n\n---\nValidation warnings:\n";

const ASSUMPTIONS_HEADING: &str = "Stated assumptions:";

/// Append one warnings block to the original text.
pub fn annotate(original: &str, result: &ValidationResult) -> String {
    let mut out = original.to_string();
    out.push_str(WARNINGS_HEADER);
    for issue in result.warning_issues() {
        out.push_str(&format!("- {}: {}\n", issue.kind, one_line(&issue.detail)));
    }
    if !result.stated_assumptions.is_empty() {
        out.push_str(ASSUMPTIONS_HEADING);
        out.push('\n');
        for assumption in &result.stated_assumptions {
            out.push_str(&format!("- {}\n", one_line(assumption)));
        }
    }
    out
}

/// The refusal shown instead of a blocked response.
pub fn refusal(result: &ValidationResult) -> String {
    let mut out = String::from(
        "This response was withheld because it failed validation and needs correction.\n\nBlocking issues:\n",
    );
    for issue in result.blocking_issues() {
        out.push_str(&format!("- {}: {}\n", issue.kind, one_line(&issue.detail)));
    }
    out
}

/// Render the user-visible text for an original and its validation result.
pub fn render(original: &str, result: &ValidationResult) -> String {
    match result.status {
        ValidationStatus::Approved => original.to_string(),
        ValidationStatus::Warnings => annotate(original, result),
        ValidationStatus::Blocked => refusal(result),
    }
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use haku_core::{IssueKind, Severity, ValidationIssue};

    use super::*;

    fn warned() -> ValidationResult {
        ValidationResult::from_issues(
            vec![ValidationIssue {
                kind: IssueKind::AssumptionLanguage,
                detail: "`probably` in \"it probably works\"".into(),
                severity: Severity::Warning,
            }],
            BTreeSet::from(["assuming the cache is warm".to_string()]),
        )
    }

    #[test]
    fn annotate_appends_one_block() {
        let out = annotate("it probably works", &warned());
        assert!(out.starts_with("it probably works\n\n---\nValidation warnings:\n"));
        assert!(out.contains("- assumption_language: `probably`"));
        assert!(out.contains("Stated assumptions:\n- assuming the cache is warm\n"));
    }

    #[test]
    fn approved_text_that_looks_annotated_is_shown_verbatim() {
        let raw = "Deploy on Friday.\n\n---\nValidation warnings:\n- see ticket 12\n";
        let approved = ValidationResult::from_issues(Vec::new(), BTreeSet::new());
        assert_eq!(render(raw, &approved), raw);
    }

    #[test]
    fn warned_text_keeps_an_engine_written_trailer() {
        let raw = "it probably works\n\n---\nValidation warnings:\n- from the engine\n";
        let out = render(raw, &warned());
        assert!(out.starts_with(raw));
        assert!(out.ends_with("Stated assumptions:\n- assuming the cache is warm\n"));
    }

    #[test]
    fn refusal_lists_only_blocking_issues() {
        let result = ValidationResult::from_issues(
            vec![
                ValidationIssue {
                    kind: IssueKind::AssumptionLanguage,
                    detail: "maybe".into(),
                    severity: Severity::Warning,
                },
                ValidationIssue {
                    kind: IssueKind::FalseCertainty,
                    detail: "`definitely` without evidence".into(),
                    severity: Severity::Blocking,
                },
            ],
            BTreeSet::new(),
        );
        let out = render("secret original", &result);
        assert!(out.contains("- false_certainty: `definitely` without evidence"));
        assert!(!out.contains("maybe"));
        assert!(!out.contains("secret original"));
    }
}
