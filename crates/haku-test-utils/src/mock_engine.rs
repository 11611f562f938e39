// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock engine adapter for deterministic testing.
//!
//! `MockEngine` implements `EngineAdapter` with a FIFO response queue per
//! engine id, optional injected failures, and a log of every call.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use haku_core::{EngineAdapter, HakuError, ProviderErrorKind};

/// The ids of the compiled default engines.
pub const DEFAULT_ENGINE_IDS: &[&str] = &["claude", "gemini", "gpt", "grok", "ollama"];

/// One recorded `invoke` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    pub engine_id: String,
    pub system_context: String,
    pub user_text: String,
}

/// A mock engine set returning queued responses.
///
/// When an engine's queue is empty it answers `mock response from <id>`.
pub struct MockEngine {
    ids: Vec<String>,
    responses: Mutex<HashMap<String, VecDeque<String>>>,
    failures: Mutex<HashMap<String, ProviderErrorKind>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<EngineCall>>,
}

impl MockEngine {
    /// A mock serving exactly these engine ids.
    pub fn new<S: AsRef<str>>(ids: &[S]) -> Self {
        Self {
            ids: ids.iter().map(|s| s.as_ref().to_string()).collect(),
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A mock serving the default engine ids.
    pub fn with_default_engines() -> Self {
        Self::new(DEFAULT_ENGINE_IDS)
    }

    /// Queue a response for an engine.
    pub fn with_response(mut self, engine_id: &str, text: &str) -> Self {
        self.responses
            .get_mut()
            .entry(engine_id.to_string())
            .or_default()
            .push_back(text.to_string());
        self
    }

    /// Make every call to an engine fail with a provider error.
    pub fn with_failure(mut self, engine_id: &str, kind: ProviderErrorKind) -> Self {
        self.failures.get_mut().insert(engine_id.to_string(), kind);
        self
    }

    /// Delay every response from an engine.
    pub fn with_delay(mut self, engine_id: &str, delay: Duration) -> Self {
        self.delays.insert(engine_id.to_string(), delay);
        self
    }

    pub async fn push_response(&self, engine_id: &str, text: &str) {
        self.responses
            .lock()
            .await
            .entry(engine_id.to_string())
            .or_default()
            .push_back(text.to_string());
    }

    pub async fn fail(&self, engine_id: &str, kind: ProviderErrorKind) {
        self.failures
            .lock()
            .await
            .insert(engine_id.to_string(), kind);
    }

    /// Every call so far, in order.
    pub async fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().await.clone()
    }

    /// Calls made to one engine.
    pub async fn calls_to(&self, engine_id: &str) -> Vec<EngineCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.engine_id == engine_id)
            .cloned()
            .collect()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::with_default_engines()
    }
}

#[async_trait]
impl EngineAdapter for MockEngine {
    async fn invoke(
        &self,
        engine_id: &str,
        system_context: &str,
        user_text: &str,
    ) -> Result<String, HakuError> {
        if !self.ids.iter().any(|id| id == engine_id) {
            return Err(HakuError::EngineNotFound(engine_id.to_string()));
        }

        self.calls.lock().await.push(EngineCall {
            engine_id: engine_id.to_string(),
            system_context: system_context.to_string(),
            user_text: user_text.to_string(),
        });

        if let Some(delay) = self.delays.get(engine_id) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(kind) = self.failures.lock().await.get(engine_id).copied() {
            return Err(HakuError::provider(
                engine_id,
                kind,
                format!("mock {kind} failure"),
            ));
        }

        Ok(self
            .responses
            .lock()
            .await
            .get_mut(engine_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| format!("mock response from {engine_id}")))
    }

    fn engine_ids(&self) -> Vec<String> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let engine = MockEngine::with_default_engines();
        let text = engine.invoke("gpt", "", "hi").await.unwrap();
        assert_eq!(text, "mock response from gpt");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order_per_engine() {
        let engine = MockEngine::with_default_engines()
            .with_response("claude", "first")
            .with_response("claude", "second")
            .with_response("gpt", "other");
        assert_eq!(engine.invoke("claude", "", "").await.unwrap(), "first");
        assert_eq!(engine.invoke("gpt", "", "").await.unwrap(), "other");
        assert_eq!(engine.invoke("claude", "", "").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn failures_and_unknown_ids() {
        let engine = MockEngine::new(&["a"]).with_failure("a", ProviderErrorKind::Timeout);
        let err = engine.invoke("a", "", "").await.unwrap_err();
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Timeout));
        let err = engine.invoke("b", "", "").await.unwrap_err();
        assert!(matches!(err, HakuError::EngineNotFound(_)));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let engine = MockEngine::with_default_engines();
        engine.invoke("grok", "sys", "build it").await.unwrap();
        let calls = engine.calls_to("grok").await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_context, "sys");
        assert_eq!(calls[0].user_text, "build it");
    }
}
