// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Haku router.
//!
//! Exposes chat, route, validate and merge over JSON, backed by a shared
//! [`haku_agent::Pipeline`].

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, QueryRequest, RouteResponse, ValidateRequest};
pub use server::{GatewayState, router, start_server};
