// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for a fully wired [`Pipeline`] backed by mocks.
//!
//! ```ignore
//! let harness = TestHarness::builder()
//!     .with_response("claude", "Reviewed.")
//!     .build()?;
//! let payload = harness.ask("Review this plan").await?;
//! ```

use std::sync::Arc;

use haku_agent::Pipeline;
use haku_config::HakuConfig;
use haku_core::{
    AgentDefinition, HakuError, KnowledgeSnippet, ProviderErrorKind, Query, ResponsePayload,
};

use crate::mock_collaborators::{MockAgentResolver, MockKnowledgeSource, RecordingAuditSink};
use crate::mock_engine::MockEngine;

/// A pipeline plus handles to every mock behind it.
pub struct TestHarness {
    pub pipeline: Pipeline,
    pub engine: Arc<MockEngine>,
    pub audit: Arc<RecordingAuditSink>,
    pub knowledge: Option<Arc<MockKnowledgeSource>>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// Run a plain-text query through the full pipeline.
    pub async fn ask(&self, text: &str) -> Result<ResponsePayload, HakuError> {
        self.pipeline.process(&Query::new(text)).await
    }
}

#[derive(Default)]
pub struct TestHarnessBuilder {
    config: Option<HakuConfig>,
    engine: Option<MockEngine>,
    responses: Vec<(String, String)>,
    failures: Vec<(String, ProviderErrorKind)>,
    agents: Option<MockAgentResolver>,
    knowledge: Option<MockKnowledgeSource>,
    failing_audit: bool,
}

impl TestHarnessBuilder {
    /// Use this config instead of the compiled defaults.
    pub fn with_config(mut self, config: HakuConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a preconfigured mock engine.
    pub fn with_engine(mut self, engine: MockEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_response(mut self, engine_id: &str, text: &str) -> Self {
        self.responses.push((engine_id.to_string(), text.to_string()));
        self
    }

    pub fn with_failure(mut self, engine_id: &str, kind: ProviderErrorKind) -> Self {
        self.failures.push((engine_id.to_string(), kind));
        self
    }

    pub fn with_agents(mut self, definitions: Vec<AgentDefinition>) -> Self {
        self.agents = Some(MockAgentResolver::new(definitions));
        self
    }

    pub fn with_agent_resolver(mut self, resolver: MockAgentResolver) -> Self {
        self.agents = Some(resolver);
        self
    }

    pub fn with_knowledge(mut self, snippets: Vec<KnowledgeSnippet>) -> Self {
        self.knowledge = Some(MockKnowledgeSource::new(snippets));
        self
    }

    pub fn with_knowledge_source(mut self, source: MockKnowledgeSource) -> Self {
        self.knowledge = Some(source);
        self
    }

    /// Make the audit sink reject every record.
    pub fn with_failing_audit(mut self) -> Self {
        self.failing_audit = true;
        self
    }

    pub fn build(self) -> Result<TestHarness, HakuError> {
        let config = Arc::new(self.config.unwrap_or_default());

        let mut engine = self.engine.unwrap_or_default();
        for (id, text) in &self.responses {
            engine = engine.with_response(id, text);
        }
        for (id, kind) in self.failures {
            engine = engine.with_failure(&id, kind);
        }
        let engine = Arc::new(engine);

        let audit = Arc::new(if self.failing_audit {
            RecordingAuditSink::failing()
        } else {
            RecordingAuditSink::new()
        });

        let mut pipeline = Pipeline::new(config, engine.clone())?.with_audit(audit.clone());
        if let Some(agents) = self.agents {
            pipeline = pipeline.with_agents(Arc::new(agents));
        }
        let knowledge = self.knowledge.map(Arc::new);
        if let Some(knowledge) = &knowledge {
            pipeline = pipeline.with_knowledge(knowledge.clone());
        }

        Ok(TestHarness {
            pipeline,
            engine,
            audit,
            knowledge,
        })
    }
}
