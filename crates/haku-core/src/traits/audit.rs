// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit trail of responses and validation outcomes.

use async_trait::async_trait;

use crate::error::HakuError;
use crate::types::AuditRecord;

/// Receives one record per completed request.
///
/// Called only after validation has finished, so an abandoned request
/// leaves nothing behind.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), HakuError>;
}
