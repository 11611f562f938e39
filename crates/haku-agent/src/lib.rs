// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query pipeline and agent definitions for Haku.
//!
//! The [`Pipeline`] is the central coordinator that:
//! - Classifies a query (task class, mode, privacy tier)
//! - Routes it to an organ and engine, applying agent definitions
//! - Adds operator context and knowledge snippets to the prompt
//! - Invokes the engine once and validates the answer
//! - Hands an audit record to the sink
//!
//! [`MultiPerspectiveMerger`] is the alternate entry point that asks two
//! fixed perspectives and synthesizes them.

pub mod agents;
pub mod audit;
pub mod merge;
pub mod pipeline;

pub use agents::FileAgentStore;
pub use audit::TracingAuditSink;
pub use merge::{MergePlan, MultiPerspectiveMerger};
pub use pipeline::{KNOWLEDGE_HEADING, Pipeline, Routed, build_prompt};
