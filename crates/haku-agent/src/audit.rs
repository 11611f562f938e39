// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default audit sink: one structured log event per validated response.

use async_trait::async_trait;
use haku_core::{AuditRecord, AuditSink, HakuError};
use tracing::info;

/// Writes audit records to the `haku::audit` tracing target.
///
/// Only metadata is logged. Response text never reaches the log, so tier-3
/// answers stay out of it too.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), HakuError> {
        info!(
            target: "haku::audit",
            operation = record.operation.as_str(),
            timestamp = %record.timestamp.to_rfc3339(),
            task_class = %record.classification.task_class,
            mode = %record.classification.mode,
            tier = record.classification.tier.level(),
            engine = record.engine_id.as_str(),
            organ = record.routing.as_ref().map(|r| r.organ.to_string()),
            agent = record.routing.as_ref().and_then(|r| r.agent.as_deref()),
            status = %record.validation.status,
            issues = record.validation.issues.len(),
            original_chars = record.original_text.chars().count(),
            "response audited"
        );
        Ok(())
    }
}
