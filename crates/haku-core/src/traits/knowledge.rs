// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The private knowledge base, seen from the router.

use async_trait::async_trait;

use crate::error::HakuError;
use crate::types::KnowledgeSnippet;

/// Returns already-decrypted snippets relevant to a query.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn lookup(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<KnowledgeSnippet>, HakuError>;
}
