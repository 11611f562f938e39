// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-perspective merge.
//!
//! Two engines answer the same query under fixed, named system contexts.
//! Only when both succeed does a third call write the synthesis. The
//! synthesis is validated; the two perspective answers are not.

use std::sync::Arc;

use chrono::Utc;
use haku_config::HakuConfig;
use haku_config::model::PerspectiveConfig;
use haku_core::{AuditRecord, AuditSink, EngineAdapter, HakuError, Query, ResponsePayload};
use haku_router::QueryRouter;
use haku_validator::{ResponseValidator, ValidatedResponse};
use tracing::info;

use crate::pipeline::{build_prompt, record_audit};

/// Runs the two-perspective merge workflow.
#[derive(Clone)]
pub struct MultiPerspectiveMerger {
    config: Arc<HakuConfig>,
    router: Arc<QueryRouter>,
    validator: Arc<ResponseValidator>,
    engines: Arc<dyn EngineAdapter>,
    audit: Arc<dyn AuditSink>,
}

/// Engines chosen for one merge, after the privacy floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub engine_a: String,
    pub engine_b: String,
    pub synthesis_engine: String,
    pub local_only: bool,
}

impl MultiPerspectiveMerger {
    pub fn new(
        config: Arc<HakuConfig>,
        router: Arc<QueryRouter>,
        validator: Arc<ResponseValidator>,
        engines: Arc<dyn EngineAdapter>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            router,
            validator,
            engines,
            audit,
        }
    }

    /// Pick engines. Tier-3 queries send every call to the local engine.
    pub fn plan(&self, local_only: bool) -> MergePlan {
        let merge = &self.config.merge;
        if local_only {
            let local = self.config.routing.local_engine.clone();
            MergePlan {
                engine_a: local.clone(),
                engine_b: local.clone(),
                synthesis_engine: local,
                local_only,
            }
        } else {
            MergePlan {
                engine_a: merge.perspective_a.engine.clone(),
                engine_b: merge.perspective_b.engine.clone(),
                synthesis_engine: merge.synthesis_engine.clone(),
                local_only,
            }
        }
    }

    pub async fn merge_all(&self, query: &Query) -> Result<ResponsePayload, HakuError> {
        let classification = self.router.classify(query);
        let plan = self.plan(classification.tier.is_local_only());
        let merge = &self.config.merge;
        let prompt = build_prompt(query, &[], self.config.knowledge.snippet_chars);

        info!(
            engine_a = plan.engine_a.as_str(),
            engine_b = plan.engine_b.as_str(),
            synthesis = plan.synthesis_engine.as_str(),
            tier = classification.tier.level(),
            local_only = plan.local_only,
            "starting merge"
        );

        let (view_a, view_b) = tokio::try_join!(
            self.engines
                .invoke(&plan.engine_a, &merge.perspective_a.system_context, &prompt),
            self.engines
                .invoke(&plan.engine_b, &merge.perspective_b.system_context, &prompt),
        )?;

        let synthesis_prompt = synthesis_prompt(
            &prompt,
            (&merge.perspective_a, &view_a),
            (&merge.perspective_b, &view_b),
        );
        let raw = self
            .engines
            .invoke(
                &plan.synthesis_engine,
                &merge.synthesis_context,
                &synthesis_prompt,
            )
            .await?;

        let validated = ValidatedResponse::new(raw, &self.validator);
        let payload = ResponsePayload {
            response_text: validated.user_text(),
            engine_id: plan.synthesis_engine.clone(),
            tier: classification.tier,
            task_class: classification.task_class,
            mode: classification.mode,
            validation_status: validated.status(),
            heritage_context_used: false,
        };

        let (original, validation) = validated.into_parts();
        record_audit(
            self.audit.as_ref(),
            AuditRecord {
                timestamp: Utc::now(),
                operation: "merge_all".to_string(),
                classification,
                engine_id: plan.synthesis_engine,
                routing: None,
                validation,
                original_text: original,
            },
        )
        .await;

        Ok(payload)
    }
}

/// The synthesis request: both views plus the three-part structure to produce.
pub fn synthesis_prompt(
    question: &str,
    (a, view_a): (&PerspectiveConfig, &str),
    (b, view_b): (&PerspectiveConfig, &str),
) -> String {
    format!(
        "Question:\n{question}\n\n\
         {a_name} perspective:\n{view_a}\n\n\
         {b_name} perspective:\n{view_b}\n\n\
         Write a synthesis in three parts:\n\
         1. {a_name} view: the {a_name}'s position in brief.\n\
         2. {b_name} view: the {b_name}'s position in brief.\n\
         3. Integrated summary: where they agree, where they differ, and a recommendation.",
        a_name = a.name,
        b_name = b.name,
    )
}
