// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the payment provider's checkout and customer APIs.
//!
//! Speaks the provider's JSON:API dialect. Checkout creation embeds the
//! local identity as `custom_data.user_id` so subscription webhooks can be
//! correlated back.

use std::time::Duration;

use adlens_config::model::BillingConfig;
use adlens_core::AdlensError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

/// Client for provider-side billing operations.
#[derive(Debug, Clone)]
pub struct BillingClient {
    client: reqwest::Client,
    config: BillingConfig,
}

impl BillingClient {
    /// Build the client from the billing section of the config.
    ///
    /// Credentials may be absent here; operations that need a missing one
    /// fail with a misconfiguration error at call time.
    pub fn new(config: BillingConfig) -> Result<Self, AdlensError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "accept",
            HeaderValue::from_static("application/vnd.api+json"),
        );
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/vnd.api+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AdlensError::Billing {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, config })
    }

    /// Create a hosted checkout for `user_id` and return its URL.
    pub async fn create_checkout(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<String, AdlensError> {
        let api_key = self.require("billing.api_key", self.config.api_key.as_deref())?;
        let store_id = self.require("billing.store_id", self.config.store_id.as_deref())?;
        let variant_id = self.require("billing.variant_id", self.config.variant_id.as_deref())?;

        let body = serde_json::json!({
            "data": {
                "type": "checkouts",
                "attributes": {
                    "checkout_data": {
                        "email": email,
                        "custom": { "user_id": user_id }
                    }
                },
                "relationships": {
                    "store": { "data": { "type": "stores", "id": store_id } },
                    "variant": { "data": { "type": "variants", "id": variant_id } }
                }
            }
        });

        let url = format!("{}/v1/checkouts", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdlensError::Billing {
                message: format!("checkout request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdlensError::Billing {
                message: format!("checkout API returned {status}: {body}"),
                source: None,
            });
        }

        let checkout: CheckoutResponse =
            response.json().await.map_err(|e| AdlensError::Billing {
                message: format!("failed to parse checkout response: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(user_id, "checkout created");
        Ok(checkout.data.attributes.url)
    }

    /// Fetch the hosted customer-portal URL for a provider customer.
    pub async fn customer_portal_url(&self, customer_id: &str) -> Result<String, AdlensError> {
        let api_key = self.require("billing.api_key", self.config.api_key.as_deref())?;

        let url = format!("{}/v1/customers/{customer_id}", self.config.api_base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| AdlensError::Billing {
                message: format!("customer request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdlensError::Billing {
                message: format!("customer API returned {status}: {body}"),
                source: None,
            });
        }

        let customer: CustomerResponse =
            response.json().await.map_err(|e| AdlensError::Billing {
                message: format!("failed to parse customer response: {e}"),
                source: Some(Box::new(e)),
            })?;

        customer
            .data
            .attributes
            .urls
            .customer_portal
            .ok_or_else(|| AdlensError::Billing {
                message: "customer record carries no portal URL".to_string(),
                source: None,
            })
    }

    fn require<'a>(&self, key: &str, value: Option<&'a str>) -> Result<&'a str, AdlensError> {
        value.ok_or_else(|| AdlensError::Misconfigured(format!("{key} is not set")))
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    data: CheckoutData,
}

#[derive(Debug, Deserialize)]
struct CheckoutData {
    attributes: CheckoutAttributes,
}

#[derive(Debug, Deserialize)]
struct CheckoutAttributes {
    url: String,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    data: CustomerData,
}

#[derive(Debug, Deserialize)]
struct CustomerData {
    attributes: CustomerAttributes,
}

#[derive(Debug, Deserialize)]
struct CustomerAttributes {
    #[serde(default)]
    urls: CustomerUrls,
}

#[derive(Debug, Default, Deserialize)]
struct CustomerUrls {
    #[serde(default)]
    customer_portal: Option<String>,
}
