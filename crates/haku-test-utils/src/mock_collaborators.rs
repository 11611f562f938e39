// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory agent resolver, knowledge source and audit sink.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use haku_core::{
    AgentDefinition, AgentResolver, AgentScope, AuditRecord, AuditSink, HakuError,
    KnowledgeSnippet, KnowledgeSource, Organ,
};

/// Resolves agents from a fixed list, first match wins.
#[derive(Debug, Default)]
pub struct MockAgentResolver {
    definitions: Vec<AgentDefinition>,
    fail: bool,
}

impl MockAgentResolver {
    pub fn new(definitions: Vec<AgentDefinition>) -> Self {
        Self {
            definitions,
            fail: false,
        }
    }

    /// A resolver whose every lookup fails.
    pub fn failing() -> Self {
        Self {
            definitions: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl AgentResolver for MockAgentResolver {
    async fn resolve_agent(
        &self,
        scope: &AgentScope,
        organ: Organ,
    ) -> Result<Option<AgentDefinition>, HakuError> {
        if self.fail {
            return Err(HakuError::Agent {
                message: "mock agent store unavailable".to_string(),
                source: None,
            });
        }
        Ok(self
            .definitions
            .iter()
            .find(|d| d.scope == *scope && d.organ == organ)
            .cloned())
    }
}

/// Returns the same snippets for every lookup and counts lookups.
#[derive(Debug, Default)]
pub struct MockKnowledgeSource {
    snippets: Vec<KnowledgeSnippet>,
    fail: bool,
    lookups: AtomicUsize,
}

impl MockKnowledgeSource {
    pub fn new(snippets: Vec<KnowledgeSnippet>) -> Self {
        Self {
            snippets,
            fail: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            snippets: Vec::new(),
            fail: true,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeSource for MockKnowledgeSource {
    async fn lookup(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<KnowledgeSnippet>, HakuError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(HakuError::Knowledge("mock knowledge base locked".to_string()));
        }
        Ok(self.snippets.iter().take(max_results).cloned().collect())
    }
}

/// Keeps every audit record in memory.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<AuditRecord>>,
    fail: bool,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every record (after counting it).
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), HakuError> {
        self.records.lock().await.push(record.clone());
        if self.fail {
            return Err(HakuError::Audit("mock audit sink full".to_string()));
        }
        Ok(())
    }
}
