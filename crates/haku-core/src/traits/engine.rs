// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine adapter trait for the external LLM providers.

use async_trait::async_trait;

use crate::error::HakuError;

/// Invokes a concrete model engine by id.
///
/// Implementations must surface every transport, authentication, rate-limit
/// or timeout failure as [`HakuError::Provider`]. They must not substitute
/// default text or silently switch to another engine.
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Sends `user_text` under `system_context` to `engine_id` and returns the answer text.
    async fn invoke(
        &self,
        engine_id: &str,
        system_context: &str,
        user_text: &str,
    ) -> Result<String, HakuError>;

    /// Engine ids this adapter can serve.
    fn engine_ids(&self) -> Vec<String>;
}
