// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort outbound notification of completed analyses.
//!
//! Dispatch happens on a spawned task with its own error channel: failures
//! are logged, never propagated into the request path, and the request does
//! not wait for delivery.

use std::time::Duration;

use adlens_config::model::NotifyConfig;
use tracing::{debug, error};

/// Fire-and-forget webhook notifier.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: String,
}

impl Notifier {
    /// Build a notifier if a webhook URL is configured.
    pub fn from_config(config: &NotifyConfig) -> Option<Self> {
        let url = config.webhook_url.clone()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .ok()?;
        Some(Self { client, url })
    }

    /// Dispatch `payload` asynchronously; the caller continues immediately.
    pub fn dispatch(&self, payload: serde_json::Value) {
        let client = self.client.clone();
        let url = self.url.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("analysis notification delivered");
                }
                Ok(response) => {
                    error!(status = %response.status(), "analysis notification rejected");
                }
                Err(e) => {
                    error!(error = %e, "failed to deliver analysis notification");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn unconfigured_notifier_is_none() {
        assert!(Notifier::from_config(&NotifyConfig { webhook_url: None }).is_none());
    }

    #[tokio::test]
    async fn dispatch_posts_payload_without_blocking() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::from_config(&NotifyConfig {
            webhook_url: Some(format!("{}/hook", server.uri())),
        })
        .unwrap();

        notifier.dispatch(serde_json::json!({"userId": "u1", "score": 85}));

        // Give the spawned task time to deliver before the mock asserts.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }

    #[tokio::test]
    async fn delivery_failure_does_not_panic() {
        let notifier = Notifier::from_config(&NotifyConfig {
            webhook_url: Some("http://127.0.0.1:1/unreachable".to_string()),
        })
        .unwrap();
        notifier.dispatch(serde_json::json!({"userId": "u1"}));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}
