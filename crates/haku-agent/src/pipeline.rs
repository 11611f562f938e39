// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The classify, route, invoke, validate pipeline.

use std::sync::Arc;

use chrono::Utc;
use haku_config::HakuConfig;
use haku_core::{
    AgentDefinition, AgentResolver, AuditRecord, AuditSink, ClassificationResult, EngineAdapter,
    HakuError, KnowledgeSnippet, KnowledgeSource, Organ, Query, ResponsePayload, RoutingDecision,
    ValidationResult,
};
use haku_router::QueryRouter;
use haku_validator::{ResponseValidator, ValidatedResponse};
use tracing::{debug, info, warn};

use crate::audit::TracingAuditSink;
use crate::merge::MultiPerspectiveMerger;

/// Heading placed before knowledge snippets in the prompt.
pub const KNOWLEDGE_HEADING: &str = "Relevant context from Heritage LLM:";

/// A classified query and where it is going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub classification: ClassificationResult,
    pub decision: RoutingDecision,
    /// The agent definition applied to the decision, if any.
    pub agent: Option<AgentDefinition>,
}

/// Everything one query needs, built once from the config snapshot.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<HakuConfig>,
    router: Arc<QueryRouter>,
    validator: Arc<ResponseValidator>,
    engines: Arc<dyn EngineAdapter>,
    agents: Option<Arc<dyn AgentResolver>>,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
    audit: Arc<dyn AuditSink>,
}

impl Pipeline {
    /// Compile the classifiers and validator. Fails only on bad configuration.
    pub fn new(config: Arc<HakuConfig>, engines: Arc<dyn EngineAdapter>) -> Result<Self, HakuError> {
        let router = QueryRouter::from_config(&config)?;
        let validator = ResponseValidator::from_config(&config.validator)?;
        Ok(Self {
            config,
            router: Arc::new(router),
            validator: Arc::new(validator),
            engines,
            agents: None,
            knowledge: None,
            audit: Arc::new(TracingAuditSink),
        })
    }

    pub fn with_agents(mut self, agents: Arc<dyn AgentResolver>) -> Self {
        self.agents = Some(agents);
        self
    }

    pub fn with_knowledge(mut self, knowledge: Arc<dyn KnowledgeSource>) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn config(&self) -> &HakuConfig {
        &self.config
    }

    pub fn engine_ids(&self) -> Vec<String> {
        self.engines.engine_ids()
    }

    /// Run the three classifiers.
    pub fn classify(&self, query: &Query) -> ClassificationResult {
        self.router.classify(query)
    }

    /// Classify, route, and apply a matching agent definition.
    pub async fn classify_and_route(&self, query: &Query) -> Result<Routed, HakuError> {
        let (classification, decision) = self.router.classify_and_route(query);
        self.finish_route(query, classification, decision).await
    }

    /// Classify, then route to a fixed organ (the `exec` and `council` shortcuts).
    pub async fn classify_and_route_fixed(
        &self,
        query: &Query,
        organ: Organ,
    ) -> Result<Routed, HakuError> {
        let (classification, decision) = self.router.classify_and_route_fixed(query, organ);
        self.finish_route(query, classification, decision).await
    }

    /// Validate a response text.
    pub fn validate(&self, response_text: &str) -> ValidationResult {
        self.validator.validate(response_text)
    }

    /// Classify, route, invoke, validate, audit.
    pub async fn process(&self, query: &Query) -> Result<ResponsePayload, HakuError> {
        let routed = self.classify_and_route(query).await?;
        self.run(query, routed, "process").await
    }

    /// Like [`process`](Self::process) with the organ chosen by the caller.
    pub async fn process_with_organ(
        &self,
        query: &Query,
        organ: Organ,
    ) -> Result<ResponsePayload, HakuError> {
        let routed = self.classify_and_route_fixed(query, organ).await?;
        self.run(query, routed, "process_with_organ").await
    }

    /// Two fixed perspectives plus a synthesis.
    pub async fn merge_all(&self, query: &Query) -> Result<ResponsePayload, HakuError> {
        self.merger().merge_all(query).await
    }

    pub fn merger(&self) -> MultiPerspectiveMerger {
        MultiPerspectiveMerger::new(
            self.config.clone(),
            self.router.clone(),
            self.validator.clone(),
            self.engines.clone(),
            self.audit.clone(),
        )
    }

    async fn finish_route(
        &self,
        query: &Query,
        classification: ClassificationResult,
        decision: RoutingDecision,
    ) -> Result<Routed, HakuError> {
        let (Some(scope), Some(agents)) = (&query.scope, &self.agents) else {
            return Ok(Routed {
                classification,
                decision,
                agent: None,
            });
        };
        if decision.local_only {
            debug!(scope = %scope, "privacy floor fired; agent lookup skipped");
            return Ok(Routed {
                classification,
                decision,
                agent: None,
            });
        }

        let agent = agents.resolve_agent(scope, decision.organ).await?;
        let (decision, agent) = match agent {
            Some(agent) => {
                let decision = self.router.organs().apply_agent(decision, &agent);
                let applied = decision.agent.is_some();
                (decision, applied.then_some(agent))
            }
            None => (decision, None),
        };
        Ok(Routed {
            classification,
            decision,
            agent,
        })
    }

    async fn run(
        &self,
        query: &Query,
        routed: Routed,
        operation: &str,
    ) -> Result<ResponsePayload, HakuError> {
        let Routed {
            classification,
            decision,
            agent,
        } = routed;

        let system_context = agent
            .as_ref()
            .and_then(|a| a.system_prompt.clone())
            .unwrap_or_else(|| self.config.agent.system_context.clone());

        let snippets = self.knowledge_for(query).await;
        let prompt = build_prompt(query, &snippets, self.config.knowledge.snippet_chars);

        info!(
            operation,
            engine = decision.engine_id.as_str(),
            organ = %decision.organ,
            tier = classification.tier.level(),
            knowledge_snippets = snippets.len(),
            "invoking engine"
        );
        let raw = self
            .engines
            .invoke(&decision.engine_id, &system_context, &prompt)
            .await?;

        let validated = ValidatedResponse::new(raw, &self.validator);
        let payload = ResponsePayload {
            response_text: validated.user_text(),
            engine_id: decision.engine_id.clone(),
            tier: classification.tier,
            task_class: classification.task_class,
            mode: classification.mode,
            validation_status: validated.status(),
            heritage_context_used: !snippets.is_empty(),
        };

        let engine_id = decision.engine_id.clone();
        let (original, validation) = validated.into_parts();
        record_audit(
            self.audit.as_ref(),
            AuditRecord {
                timestamp: Utc::now(),
                operation: operation.to_string(),
                classification,
                engine_id,
                routing: Some(decision),
                validation,
                original_text: original,
            },
        )
        .await;

        Ok(payload)
    }

    async fn knowledge_for(&self, query: &Query) -> Vec<KnowledgeSnippet> {
        let Some(knowledge) = &self.knowledge else {
            return Vec::new();
        };
        if !self.config.knowledge.enabled {
            return Vec::new();
        }
        match knowledge
            .lookup(&query.text, self.config.knowledge.max_results)
            .await
        {
            Ok(mut snippets) => {
                snippets.truncate(self.config.knowledge.max_results);
                snippets
            }
            Err(e) => {
                warn!(error = %e, "knowledge lookup failed; continuing without context");
                Vec::new()
            }
        }
    }
}

/// Send a record to the audit sink, logging instead of failing.
pub(crate) async fn record_audit(sink: &dyn AuditSink, record: AuditRecord) {
    if let Err(e) = sink.record(&record).await {
        warn!(
            operation = record.operation.as_str(),
            error = %e,
            "audit sink rejected record"
        );
    }
}

/// Append operator context and knowledge snippets to the query text.
pub fn build_prompt(query: &Query, snippets: &[KnowledgeSnippet], snippet_chars: usize) -> String {
    let mut prompt = query.text.clone();
    if let Some(context) = query.context.as_deref().filter(|c| !c.trim().is_empty()) {
        prompt.push_str("\n\nAdditional context:\n");
        prompt.push_str(context);
    }
    if !snippets.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(KNOWLEDGE_HEADING);
        prompt.push('\n');
        for snippet in snippets {
            let excerpt: String = snippet.content.chars().take(snippet_chars).collect();
            prompt.push_str(&format!("- [{}]: {excerpt}...\n", snippet.topic));
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_extras_is_the_query() {
        assert_eq!(build_prompt(&Query::new("hi"), &[], 200), "hi");
    }

    #[test]
    fn prompt_appends_context_and_snippets() {
        let q = Query::new("What did we decide?").with_context("Q3 board deck");
        let snippets = vec![KnowledgeSnippet {
            topic: "pricing".into(),
            content: "a".repeat(300),
        }];
        let prompt = build_prompt(&q, &snippets, 200);
        assert!(prompt.starts_with("What did we decide?\n\nAdditional context:\nQ3 board deck"));
        assert!(prompt.contains("\n\nRelevant context from Heritage LLM:\n- [pricing]: "));
        let line = prompt.lines().last().unwrap();
        assert_eq!(line, format!("- [pricing]: {}...", "a".repeat(200)));
    }
}
