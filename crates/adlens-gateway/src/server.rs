// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use adlens_billing::{BillingClient, EntitlementGate};
use adlens_config::model::ServerConfig;
use adlens_core::AdlensError;
use adlens_storage::Store;
use adlens_vision::VisionClient;

use crate::auth::AuthClient;
use crate::handlers;
use crate::notify::Notifier;

/// Data-URL image uploads run to a few megabytes; leave generous headroom.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Identity and usage records.
    pub store: Arc<Store>,
    /// Free-tier entitlement gate.
    pub gate: Arc<EntitlementGate>,
    /// Payment provider client (checkout + portal).
    pub billing: Arc<BillingClient>,
    /// Vision client; `None` serves the built-in sample results.
    pub vision: Option<Arc<VisionClient>>,
    /// Session verification against the auth provider.
    pub auth: AuthClient,
    /// Fire-and-forget result notifier.
    pub notifier: Option<Notifier>,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: Option<String>,
    /// Health state for the public endpoint.
    pub health: HealthState,
}

/// Build the full route table over the given state.
pub fn build_router(state: GatewayState) -> Router {
    // Unauthenticated public route (health for load balancers and systemd).
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    // API routes. Identity is optional on analysis and resolved per-handler,
    // so there is no blanket auth middleware here; the webhook authenticates
    // by signature instead.
    let api_routes = Router::new()
        .route(
            "/v1/analyses",
            post(handlers::post_analyze).get(handlers::get_analyses),
        )
        .route("/v1/analyses/compare", post(handlers::post_compare))
        .route("/v1/billing/checkout", post(handlers::post_checkout))
        .route("/v1/billing/portal", post(handlers::post_portal))
        .route("/v1/webhooks/lemonsqueezy", post(handlers::post_webhook))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AdlensError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AdlensError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AdlensError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
