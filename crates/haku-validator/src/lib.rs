// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-response validation for Haku.
//!
//! [`ResponseValidator`] inspects an engine's raw answer for hedging,
//! self-contradiction and unsupported certainty. [`ValidatedResponse`] keeps
//! the raw answer next to its result and renders what the user sees: the
//! raw text, the raw text plus one warnings block, or a refusal.

pub mod annotate;
pub mod sentence;
pub mod validator;

pub use annotate::{WARNINGS_HEADER, annotate, refusal, render};
pub use validator::ResponseValidator;

use haku_core::{ValidationResult, ValidationStatus};

/// An engine answer paired with its validation result.
///
/// The original text is never modified; annotation happens on render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedResponse {
    original: String,
    result: ValidationResult,
}

impl ValidatedResponse {
    /// Validate `original` and keep both.
    pub fn new(original: impl Into<String>, validator: &ResponseValidator) -> Self {
        let original = original.into();
        let result = validator.validate(&original);
        Self { original, result }
    }

    /// The raw engine text, for the audit sink.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn status(&self) -> ValidationStatus {
        self.result.status
    }

    /// The text shown to the user.
    pub fn user_text(&self) -> String {
        render(&self.original, &self.result)
    }

    pub fn into_parts(self) -> (String, ValidationResult) {
        (self.original, self.result)
    }
}
