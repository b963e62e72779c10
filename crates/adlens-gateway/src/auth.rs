// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolution against the external auth provider.
//!
//! The gateway never mints or validates tokens itself; it forwards the
//! bearer token to the provider's verification endpoint and threads the
//! resolved identity into handlers as an explicit `Option<Identity>`. A
//! request without a token is anonymous, not an error.

use std::time::Duration;

use adlens_config::model::AuthConfig;
use adlens_core::AdlensError;
use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::debug;

/// A verified identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Client for the auth provider's session verification endpoint.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    verify_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: String,
    #[serde(default)]
    email: Option<String>,
}

impl AuthClient {
    pub fn new(config: &AuthConfig) -> Result<Self, AdlensError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AdlensError::Internal(format!("failed to build auth client: {e}")))?;
        Ok(Self {
            client,
            verify_url: config.verify_url.clone(),
        })
    }

    /// Resolve the request's identity from its `Authorization` header.
    ///
    /// - No bearer token, or no verification endpoint configured: anonymous.
    /// - Provider rejects the token: anonymous (stale sessions are routine).
    /// - Provider unreachable: error; callers that require identity turn
    ///   this into an auth failure rather than guessing.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, AdlensError> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let (Some(token), Some(verify_url)) = (token, self.verify_url.as_deref()) else {
            return Ok(None);
        };

        let response = self
            .client
            .post(verify_url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(|e| AdlensError::Unauthenticated(format!("auth provider unreachable: {e}")))?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "session token rejected by auth provider");
            return Ok(None);
        }

        let verified: VerifyResponse = response.json().await.map_err(|e| {
            AdlensError::Unauthenticated(format!("invalid auth provider response: {e}"))
        })?;

        Ok(Some(Identity {
            user_id: verified.user_id,
            email: verified.email,
        }))
    }
}
