// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Adlens REST API.
//!
//! Handles analysis, comparison, billing, and webhook routes. Identity is
//! resolved per-request and threaded through explicitly; only the webhook
//! route authenticates by signature instead.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use adlens_billing::{apply_event, verify_signature, Applied, SubscriptionEvent};
use adlens_core::types::{now_timestamp, Analysis};
use adlens_core::AdlensError;
use adlens_vision::{sample_comparison, sample_critique, BrandContext, Comparison, Critique};

use crate::auth::Identity;
use crate::server::GatewayState;

/// Request body for POST /v1/analyses.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Image as a data URL.
    pub image: String,
    /// Optional brand context to weave into the critique.
    #[serde(default)]
    pub context: Option<BrandContext>,
}

/// Request body for POST /v1/analyses/compare.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub image_a: String,
    pub image_b: String,
}

/// Response body for GET /v1/analyses.
#[derive(Debug, Serialize)]
pub struct AnalysisListResponse {
    pub analyses: Vec<AnalysisItem>,
}

/// One usage record in a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisItem {
    pub id: String,
    pub score: i64,
    pub summary: String,
    pub created_at: String,
}

/// Response body for the billing redirect routes.
#[derive(Debug, Serialize)]
pub struct RedirectUrlResponse {
    pub url: String,
}

/// Webhook acknowledged and applied (or deliberately ignored).
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Webhook acknowledged as a no-op with an explanation.
#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    /// Machine-readable code for rejections the UI branches on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Map a domain error onto its HTTP shape.
///
/// Quota rejections carry the `LIMIT_REACHED` code so clients can route to
/// the upgrade flow instead of a generic error screen. Storage and provider
/// details never leak into response bodies.
pub(crate) fn error_response(err: &AdlensError) -> Response {
    let (status, message, code) = match err {
        AdlensError::QuotaExceeded { .. } => (
            StatusCode::FORBIDDEN,
            "daily limit reached".to_string(),
            Some("LIMIT_REACHED".to_string()),
        ),
        AdlensError::Unauthenticated(message) => {
            (StatusCode::UNAUTHORIZED, message.clone(), None)
        }
        AdlensError::Misconfigured(message) => {
            (StatusCode::INTERNAL_SERVER_ERROR, message.clone(), None)
        }
        AdlensError::Billing { message, .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, message.clone(), None)
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
            None,
        ),
    };
    (
        status,
        Json(ErrorResponse {
            error: message,
            code,
        }),
    )
        .into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "unauthorized".to_string(),
            code: None,
        }),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            code: None,
        }),
    )
        .into_response()
}

async fn require_identity(
    state: &GatewayState,
    headers: &HeaderMap,
) -> Result<Identity, Response> {
    match state.auth.resolve(headers).await {
        Ok(Some(identity)) => Ok(identity),
        Ok(None) => Err(unauthorized()),
        Err(e) => Err(error_response(&e)),
    }
}

/// POST /v1/analyses
///
/// Runs the entitlement gate, requests a critique, persists the usage
/// record for identified users, and dispatches the best-effort notifier.
/// Anonymous requests are served but never metered or persisted.
pub async fn post_analyze(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeRequest>,
) -> Response {
    let identity = match state.auth.resolve(&headers).await {
        Ok(identity) => identity,
        Err(e) => return error_response(&e),
    };

    if body.image.is_empty() {
        return bad_request("no image provided");
    }

    if let Err(e) = state
        .gate
        .check(identity.as_ref().map(|i| i.user_id.as_str()), Local::now())
        .await
    {
        return error_response(&e);
    }

    let critique = run_critique(&state, &body).await;

    if let Some(identity) = &identity {
        persist_analysis(&state, identity, &body, &critique).await;
    }

    if let Some(notifier) = &state.notifier {
        notifier.dispatch(serde_json::json!({
            "userId": identity.as_ref().map(|i| i.user_id.as_str()),
            "analysis": critique,
            "context": body.context,
            "timestamp": now_timestamp(),
        }));
    }

    (StatusCode::OK, Json(critique)).into_response()
}

async fn run_critique(state: &GatewayState, body: &AnalyzeRequest) -> Critique {
    match &state.vision {
        Some(vision) => match vision.analyze(&body.image, body.context.as_ref()).await {
            Ok(critique) => critique,
            Err(e) => {
                warn!(error = %e, "vision analysis failed, serving sample critique");
                sample_critique()
            }
        },
        None => {
            warn!("vision provider not configured, serving sample critique");
            sample_critique()
        }
    }
}

/// Best-effort persistence: a storage failure loses the record but not the
/// response the user already paid latency for.
async fn persist_analysis(
    state: &GatewayState,
    identity: &Identity,
    body: &AnalyzeRequest,
    critique: &Critique,
) {
    let now = now_timestamp();
    let email = identity.email.as_deref().unwrap_or("");

    if let Err(e) = state
        .store
        .ensure_user(&identity.user_id, email, &now)
        .await
    {
        error!(error = %e, user_id = %identity.user_id, "failed to mirror identity");
        return;
    }

    let record = Analysis {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: identity.user_id.clone(),
        image_ref: truncate_image_ref(&body.image),
        score: critique.score,
        summary: critique.summary.clone(),
        result: serde_json::to_string(critique).unwrap_or_default(),
        context: body
            .context
            .as_ref()
            .and_then(|c| serde_json::to_string(c).ok()),
        created_at: now,
    };

    if let Err(e) = state.store.insert_analysis(&record).await {
        error!(error = %e, user_id = %identity.user_id, "failed to persist analysis");
    }
}

/// Keep only a short prefix of the (potentially megabytes-long) data URL.
fn truncate_image_ref(image: &str) -> String {
    let prefix: String = image.chars().take(100).collect();
    format!("{prefix}...")
}

/// POST /v1/analyses/compare
///
/// A/B comparison of two visuals. Requires identity; not metered.
pub async fn post_compare(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<CompareRequest>,
) -> Response {
    let _identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if body.image_a.is_empty() || body.image_b.is_empty() {
        return bad_request("both images are required");
    }

    let comparison: Comparison = match &state.vision {
        Some(vision) => match vision.compare(&body.image_a, &body.image_b).await {
            Ok(comparison) => comparison,
            Err(e) => {
                warn!(error = %e, "vision comparison failed, serving sample verdict");
                sample_comparison()
            }
        },
        None => {
            warn!("vision provider not configured, serving sample verdict");
            sample_comparison()
        }
    };

    (StatusCode::OK, Json(comparison)).into_response()
}

/// GET /v1/analyses
///
/// The caller's usage records, newest first.
pub async fn get_analyses(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match state.store.list_analyses(&identity.user_id, None).await {
        Ok(analyses) => {
            let items = analyses
                .into_iter()
                .map(|a| AnalysisItem {
                    id: a.id,
                    score: a.score,
                    summary: a.summary,
                    created_at: a.created_at,
                })
                .collect();
            (StatusCode::OK, Json(AnalysisListResponse { analyses: items })).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /v1/billing/checkout
///
/// Creates a hosted checkout carrying the identity as correlation data.
pub async fn post_checkout(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let email = identity.email.as_deref().unwrap_or("");
    match state.billing.create_checkout(&identity.user_id, email).await {
        Ok(url) => (StatusCode::OK, Json(RedirectUrlResponse { url })).into_response(),
        Err(e) => {
            error!(error = %e, "checkout creation failed");
            error_response(&e)
        }
    }
}

/// POST /v1/billing/portal
///
/// Looks up the identity's provider customer and returns its portal URL.
/// 404 when no subscription has ever been applied to the identity.
pub async fn post_portal(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let customer_id = match state.store.get_user(&identity.user_id).await {
        Ok(user) => user.and_then(|u| u.customer_id),
        Err(e) => return error_response(&e),
    };

    let Some(customer_id) = customer_id else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no subscription found".to_string(),
                code: None,
            }),
        )
            .into_response();
    };

    match state.billing.customer_portal_url(&customer_id).await {
        Ok(url) => (StatusCode::OK, Json(RedirectUrlResponse { url })).into_response(),
        Err(e) => {
            error!(error = %e, "portal URL lookup failed");
            error_response(&e)
        }
    }
}

/// POST /v1/webhooks/lemonsqueezy
///
/// Verifies the `X-Signature` HMAC over the raw body before parsing
/// anything, then applies the event. No secret configured means no
/// verification is possible: fail closed with a server error.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(secret) = state.webhook_secret.as_deref() else {
        return error_response(&AdlensError::Misconfigured(
            "webhook secret not configured".to_string(),
        ));
    };

    let signature = headers.get("x-signature").and_then(|v| v.to_str().ok());
    if let Err(e) = verify_signature(&body, signature, secret) {
        return error_response(&e);
    }

    let event: SubscriptionEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "verified webhook body is not a valid event");
            return error_response(&AdlensError::Internal("webhook processing failed".into()));
        }
    };

    match apply_event(&state.store, &event, &now_timestamp()).await {
        Ok(Applied::NoCorrelation) => (
            StatusCode::OK,
            Json(WebhookMessage {
                message: "no user correlation in event".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => (StatusCode::OK, Json(WebhookAck { received: true })).into_response(),
        Err(e) => {
            error!(error = %e, "webhook application failed");
            error_response(&e)
        }
    }
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}
