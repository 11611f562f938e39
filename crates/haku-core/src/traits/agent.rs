// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lookup of custom agent definitions.

use async_trait::async_trait;

use crate::error::HakuError;
use crate::types::{AgentDefinition, AgentScope, Organ};

/// Resolves a custom agent definition for an organ within a group or workstream.
///
/// `Ok(None)` means "no definition on file"; the caller falls back to the
/// organ's default engine.
#[async_trait]
pub trait AgentResolver: Send + Sync {
    async fn resolve_agent(
        &self,
        scope: &AgentScope,
        organ: Organ,
    ) -> Result<Option<AgentDefinition>, HakuError>;
}
