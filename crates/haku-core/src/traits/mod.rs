// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits for everything the core calls but does not own.
//!
//! All traits use `#[async_trait]` so they can be held as
//! `Arc<dyn Trait>` by the pipeline.

pub mod agent;
pub mod audit;
pub mod engine;
pub mod knowledge;

pub use agent::AgentResolver;
pub use audit::AuditSink;
pub use engine::EngineAdapter;
pub use knowledge::KnowledgeSource;
