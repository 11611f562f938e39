// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP engine adapters for Haku.
//!
//! Each `[[engines]]` entry becomes an [`HttpEngine`] speaking one of four
//! wire protocols:
//! - `anthropic`: Messages API
//! - `openai`: chat completions (also used for Grok via its compatible endpoint)
//! - `gemini`: `generateContent`
//! - `ollama`: local `/api/generate`
//!
//! [`EngineRegistry`] implements [`haku_core::EngineAdapter`] over all of them.

pub mod client;
pub mod registry;
pub mod types;

pub use client::{HttpEngine, resolve_api_key, status_kind};
pub use registry::EngineRegistry;
