// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine lookup by id, exposed through the [`EngineAdapter`] trait.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use haku_config::HakuConfig;
use haku_core::{EngineAdapter, HakuError};
use tracing::{debug, info};

use crate::client::HttpEngine;

/// Every configured engine, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, HttpEngine>,
}

impl EngineRegistry {
    /// Build one HTTP client per `[[engines]]` entry.
    pub fn from_config(config: &HakuConfig) -> Result<Self, HakuError> {
        let timeout = Duration::from_secs(config.invocation.timeout_secs);
        let mut registry = Self::default();
        for engine in &config.engines {
            registry.insert(HttpEngine::new(engine, timeout)?);
        }
        info!(
            engines = registry.engines.len(),
            timeout_secs = config.invocation.timeout_secs,
            "engine registry ready"
        );
        Ok(registry)
    }

    pub fn insert(&mut self, engine: HttpEngine) {
        self.engines.insert(engine.id().to_string(), engine);
    }

    pub fn get(&self, id: &str) -> Option<&HttpEngine> {
        self.engines.get(id)
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[async_trait]
impl EngineAdapter for EngineRegistry {
    async fn invoke(
        &self,
        engine_id: &str,
        system_context: &str,
        user_text: &str,
    ) -> Result<String, HakuError> {
        let engine = self
            .get(engine_id)
            .ok_or_else(|| HakuError::EngineNotFound(engine_id.to_string()))?;
        debug!(
            engine = engine_id,
            model = engine.model(),
            "invoking engine"
        );
        engine.complete(system_context, user_text).await
    }

    fn engine_ids(&self) -> Vec<String> {
        self.engines.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_registers_all_engines() {
        let registry = EngineRegistry::from_config(&HakuConfig::default()).unwrap();
        assert_eq!(
            registry.engine_ids(),
            vec!["claude", "gemini", "gpt", "grok", "ollama"]
        );
    }

    #[tokio::test]
    async fn unknown_engine_is_reported() {
        let registry = EngineRegistry::default();
        let err = registry.invoke("nope", "", "hi").await.unwrap_err();
        assert!(matches!(err, HakuError::EngineNotFound(id) if id == "nope"));
    }
}
