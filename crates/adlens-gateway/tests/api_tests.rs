// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the gateway router with in-process requests.
//!
//! The vision provider is left unconfigured so analysis serves the built-in
//! sample critique; the auth provider is mocked with wiremock where an
//! identity is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use adlens_billing::{webhook, BillingClient, EntitlementGate};
use adlens_config::model::{AuthConfig, BillingConfig, QuotaConfig, StorageConfig};
use adlens_gateway::{build_router, AuthClient, GatewayState, HealthState};
use adlens_storage::Store;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-webhook-secret";

struct TestGateway {
    router: Router,
    store: Arc<Store>,
    _dir: tempfile::TempDir,
}

async fn setup(webhook_secret: Option<&str>, auth_verify_url: Option<String>) -> TestGateway {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig {
        database_path: dir.path().join("api.db").to_string_lossy().into_owned(),
        wal_mode: true,
    };
    let store = Arc::new(Store::open(&storage).await.unwrap());

    let state = GatewayState {
        store: store.clone(),
        gate: Arc::new(EntitlementGate::new(
            store.clone(),
            &QuotaConfig { daily_limit: 3 },
        )),
        billing: Arc::new(BillingClient::new(BillingConfig::default()).unwrap()),
        vision: None,
        auth: AuthClient::new(&AuthConfig {
            verify_url: auth_verify_url,
        })
        .unwrap(),
        notifier: None,
        webhook_secret: webhook_secret.map(String::from),
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    };

    TestGateway {
        router: build_router(state),
        store,
        _dir: dir,
    }
}

async fn mock_auth_provider(user_id: &str, email: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"user_id": user_id, "email": email}),
        ))
        .mount(&server)
        .await;
    server
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn subscription_event(event_name: &str, user_id: Option<&str>, status: &str) -> String {
    let custom = match user_id {
        Some(id) => serde_json::json!({"user_id": id}),
        None => serde_json::json!({}),
    };
    serde_json::json!({
        "meta": {"event_name": event_name, "custom_data": custom},
        "data": {
            "id": "sub-1",
            "attributes": {"customer_id": 777, "variant_id": 31, "status": status}
        }
    })
    .to_string()
}

#[tokio::test]
async fn health_is_public_and_reports_version() {
    let gateway = setup(Some(SECRET), None).await;
    let response = gateway
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn anonymous_analysis_serves_sample_critique() {
    let gateway = setup(Some(SECRET), None).await;
    let body = serde_json::json!({"image": "data:image/png;base64,AAA"}).to_string();
    let response = gateway
        .router
        .oneshot(json_post("/v1/analyses", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 85);
    assert!(json["recommendations"].is_array());
}

#[tokio::test]
async fn analysis_without_image_is_rejected() {
    let gateway = setup(Some(SECRET), None).await;
    let body = serde_json::json!({"image": ""}).to_string();
    let response = gateway
        .router
        .oneshot(json_post("/v1/analyses", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fourth_analysis_of_the_day_hits_the_quota() {
    let auth_server = mock_auth_provider("u1", "u1@example.com").await;
    let gateway = setup(Some(SECRET), Some(format!("{}/verify", auth_server.uri()))).await;

    for attempt in 0..3 {
        let body = serde_json::json!({"image": "data:image/png;base64,AAA"}).to_string();
        let mut request = json_post("/v1/analyses", body);
        request
            .headers_mut()
            .insert("authorization", "Bearer sess-1".parse().unwrap());
        let response = gateway.router.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "attempt {attempt} should pass the gate"
        );
    }

    let body = serde_json::json!({"image": "data:image/png;base64,AAA"}).to_string();
    let mut request = json_post("/v1/analyses", body);
    request
        .headers_mut()
        .insert("authorization", "Bearer sess-1".parse().unwrap());
    let response = gateway.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LIMIT_REACHED");
}

#[tokio::test]
async fn active_subscriber_is_never_quota_limited() {
    let auth_server = mock_auth_provider("pro", "pro@example.com").await;
    let gateway = setup(Some(SECRET), Some(format!("{}/verify", auth_server.uri()))).await;

    gateway
        .store
        .apply_subscription(
            "pro",
            "sub-1",
            "cust-1",
            "var-1",
            "active",
            "2024-05-01T00:00:00.000Z",
        )
        .await
        .unwrap();

    for _ in 0..5 {
        let body = serde_json::json!({"image": "data:image/png;base64,AAA"}).to_string();
        let mut request = json_post("/v1/analyses", body);
        request
            .headers_mut()
            .insert("authorization", "Bearer sess-pro".parse().unwrap());
        let response = gateway.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn listing_analyses_requires_identity() {
    let gateway = setup(Some(SECRET), None).await;
    let response = gateway
        .router
        .oneshot(
            Request::builder()
                .uri("/v1/analyses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn compare_requires_identity() {
    let gateway = setup(Some(SECRET), None).await;
    let body = serde_json::json!({"imageA": "a", "imageB": "b"}).to_string();
    let response = gateway
        .router
        .oneshot(json_post("/v1/analyses/compare", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn compare_serves_sample_verdict_for_identified_user() {
    let auth_server = mock_auth_provider("u1", "u1@example.com").await;
    let gateway = setup(Some(SECRET), Some(format!("{}/verify", auth_server.uri()))).await;

    let body = serde_json::json!({"imageA": "data:a", "imageB": "data:b"}).to_string();
    let mut request = json_post("/v1/analyses/compare", body);
    request
        .headers_mut()
        .insert("authorization", "Bearer sess-1".parse().unwrap());
    let response = gateway.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["winner"] == "A" || json["winner"] == "B");
    assert!(json["keyDiffs"].is_array());
}

#[tokio::test]
async fn portal_without_subscription_is_not_found() {
    let auth_server = mock_auth_provider("u1", "u1@example.com").await;
    let gateway = setup(Some(SECRET), Some(format!("{}/verify", auth_server.uri()))).await;

    let mut request = json_post("/v1/billing/portal", String::new());
    request
        .headers_mut()
        .insert("authorization", "Bearer sess-1".parse().unwrap());
    let response = gateway.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_with_valid_signature_applies_subscription() {
    let gateway = setup(Some(SECRET), None).await;
    let body = subscription_event("subscription_created", Some("u1"), "active");
    let signature = webhook::sign(body.as_bytes(), SECRET);

    let mut request = json_post("/v1/webhooks/lemonsqueezy", body);
    request
        .headers_mut()
        .insert("x-signature", signature.parse().unwrap());
    let response = gateway.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);

    let user = gateway.store.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.status.as_deref(), Some("active"));
    assert_eq!(user.customer_id.as_deref(), Some("777"));
}

#[tokio::test]
async fn webhook_with_bad_signature_is_rejected_without_mutation() {
    let gateway = setup(Some(SECRET), None).await;
    let body = subscription_event("subscription_created", Some("u1"), "active");

    let mut request = json_post("/v1/webhooks/lemonsqueezy", body);
    request
        .headers_mut()
        .insert("x-signature", "0".repeat(64).parse().unwrap());
    let response = gateway.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(gateway.store.get_user("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn webhook_without_signature_header_is_rejected() {
    let gateway = setup(Some(SECRET), None).await;
    let body = subscription_event("subscription_created", Some("u1"), "active");
    let response = gateway
        .router
        .oneshot(json_post("/v1/webhooks/lemonsqueezy", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_without_configured_secret_is_a_server_error() {
    let gateway = setup(None, None).await;
    let body = subscription_event("subscription_created", Some("u1"), "active");
    let signature = webhook::sign(body.as_bytes(), SECRET);

    let mut request = json_post("/v1/webhooks/lemonsqueezy", body);
    request
        .headers_mut()
        .insert("x-signature", signature.parse().unwrap());
    let response = gateway.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn webhook_without_correlation_is_acknowledged() {
    let gateway = setup(Some(SECRET), None).await;
    let body = subscription_event("subscription_created", None, "active");
    let signature = webhook::sign(body.as_bytes(), SECRET);

    let mut request = json_post("/v1/webhooks/lemonsqueezy", body);
    request
        .headers_mut()
        .insert("x-signature", signature.parse().unwrap());
    let response = gateway.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].is_string());
    assert!(gateway.store.get_user("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn cancellation_webhook_downgrades_status_only() {
    let gateway = setup(Some(SECRET), None).await;

    let created = subscription_event("subscription_created", Some("u1"), "active");
    let sig = webhook::sign(created.as_bytes(), SECRET);
    let mut request = json_post("/v1/webhooks/lemonsqueezy", created);
    request
        .headers_mut()
        .insert("x-signature", sig.parse().unwrap());
    gateway.router.clone().oneshot(request).await.unwrap();

    let cancelled = subscription_event("subscription_cancelled", Some("u1"), "cancelled");
    let sig = webhook::sign(cancelled.as_bytes(), SECRET);
    let mut request = json_post("/v1/webhooks/lemonsqueezy", cancelled);
    request
        .headers_mut()
        .insert("x-signature", sig.parse().unwrap());
    let response = gateway.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = gateway.store.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.status.as_deref(), Some("cancelled"));
    assert_eq!(user.subscription_id.as_deref(), Some("sub-1"));
}
