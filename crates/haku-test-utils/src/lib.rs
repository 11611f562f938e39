// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Haku integration tests.
//!
//! Provides a scripted [`MockEngine`], in-memory stand-ins for the agent
//! store, knowledge base and audit sink, and a [`TestHarness`] that wires
//! them into a real [`haku_agent::Pipeline`].

pub mod harness;
pub mod mock_collaborators;
pub mod mock_engine;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_collaborators::{MockAgentResolver, MockKnowledgeSource, RecordingAuditSink};
pub use mock_engine::{DEFAULT_ENGINE_IDS, EngineCall, MockEngine};
