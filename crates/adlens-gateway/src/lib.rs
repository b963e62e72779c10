// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Adlens service.
//!
//! Exposes the analysis, comparison, billing, and webhook routes over axum,
//! with per-request identity resolution and a public health endpoint.

pub mod auth;
pub mod handlers;
pub mod notify;
pub mod server;

pub use auth::{AuthClient, Identity};
pub use notify::Notifier;
pub use server::{build_router, start_server, GatewayState, HealthState};
