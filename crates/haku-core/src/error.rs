// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Haku router.

use strum::Display;
use thiserror::Error;

/// What went wrong on an engine call.
///
/// Every kind is caller-visible. The core never retries and never
/// substitutes fallback text for a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Connection refused, DNS failure, broken body.
    Transport,
    /// Missing or rejected API key (401/403).
    Authentication,
    /// The provider throttled the request (429).
    RateLimited,
    /// The call exceeded the configured invocation timeout.
    Timeout,
    /// Any other non-success response or an unparseable body.
    Api,
}

/// The primary error type used across Haku crates.
#[derive(Debug, Error)]
pub enum HakuError {
    /// Configuration errors (malformed TOML, empty phrase lists, unknown engine ids).
    #[error("configuration error: {0}")]
    Config(String),

    /// An external engine invocation failed.
    #[error("provider error from `{engine}` ({kind}): {message}")]
    Provider {
        engine: String,
        kind: ProviderErrorKind,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A routing decision named an engine that no adapter serves.
    #[error("engine not found: {0}")]
    EngineNotFound(String),

    /// The agent definition store failed.
    #[error("agent store error: {message}")]
    Agent {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The knowledge source failed to answer a lookup.
    #[error("knowledge source error: {0}")]
    Knowledge(String),

    /// The audit sink rejected a record.
    #[error("audit sink error: {0}")]
    Audit(String),

    /// Filesystem or socket errors outside the agent store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HakuError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(
        engine: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        HakuError::Provider {
            engine: engine.into(),
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error came from an engine invocation.
    pub fn is_provider(&self) -> bool {
        matches!(self, HakuError::Provider { .. })
    }

    /// The provider failure kind, if this is a provider error.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            HakuError::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
