// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Haku router.
//!
//! This crate provides the domain types (queries, classifications, routing
//! decisions, validation results, payloads), the shared error type, and the
//! traits for the external collaborators the pipeline talks to: model
//! engines, the agent definition store, the knowledge base and the audit sink.

pub mod error;
pub mod text;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{HakuError, ProviderErrorKind};
pub use types::{
    AgentDefinition, AgentScope, AuditRecord, ClassificationResult, IssueKind, KnowledgeSnippet,
    Mode, Organ, PrivacyTier, Query, ResponsePayload, RoutingDecision, Severity, TaskClass,
    ValidationIssue, ValidationResult, ValidationStatus,
};

pub use text::{PhraseMatch, PhraseSet, normalize};
pub use traits::{AgentResolver, AuditSink, EngineAdapter, KnowledgeSource};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;

    struct EchoEngine;

    #[async_trait]
    impl EngineAdapter for EchoEngine {
        async fn invoke(
            &self,
            engine_id: &str,
            _system_context: &str,
            user_text: &str,
        ) -> Result<String, HakuError> {
            Ok(format!("{engine_id}: {user_text}"))
        }

        fn engine_ids(&self) -> Vec<String> {
            vec!["echo".to_string()]
        }
    }

    #[tokio::test]
    async fn engine_adapter_is_object_safe() {
        let engine: Arc<dyn EngineAdapter> = Arc::new(EchoEngine);
        let out = engine.invoke("echo", "", "hi").await.unwrap();
        assert_eq!(out, "echo: hi");
        assert_eq!(engine.engine_ids(), vec!["echo"]);
    }

    #[test]
    fn all_collaborator_traits_are_exported() {
        fn _assert_engine<T: EngineAdapter>() {}
        fn _assert_resolver<T: AgentResolver>() {}
        fn _assert_knowledge<T: KnowledgeSource>() {}
        fn _assert_audit<T: AuditSink>() {}
    }
}
