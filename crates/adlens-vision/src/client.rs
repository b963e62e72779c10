// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the vision/LLM provider's chat completions API.
//!
//! Provides [`VisionClient`] which handles request construction,
//! authentication, and structured-response parsing. The provider is treated
//! as an opaque collaborator; there is no retry or backoff here, and a
//! failure is the caller's cue to fall back to the built-in sample critique.

use std::time::Duration;

use adlens_config::model::VisionConfig;
use adlens_core::AdlensError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::prompt;
use crate::types::{
    BrandContext, ChatMessage, ChatRequest, ChatResponse, Comparison, ContentPart, Critique,
    ImageUrl, ResponseFormat,
};

/// Token budget for comparison requests; the verdict is much smaller than a
/// full critique.
const COMPARE_MAX_TOKENS: u32 = 500;

/// Client for vision critique and comparison requests.
#[derive(Debug, Clone)]
pub struct VisionClient {
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl VisionClient {
    /// Build the client from the vision section of the config.
    ///
    /// Fails with a misconfiguration error when no API key is set; callers
    /// that can degrade (sample fallback) decide that at construction time.
    pub fn new(config: &VisionConfig) -> Result<Self, AdlensError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| AdlensError::Misconfigured("vision.api_key is not set".into()))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| AdlensError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AdlensError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config.base_url.clone(),
        })
    }

    /// Request a structured critique of one image.
    ///
    /// `image` is a data URL (or any URL the provider accepts).
    pub async fn analyze(
        &self,
        image: &str,
        context: Option<&BrandContext>,
    ) -> Result<Critique, AdlensError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt::critique_prompt(context),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_string(),
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        self.complete(&request).await
    }

    /// Request an A/B verdict between two images.
    pub async fn compare(&self, image_a: &str, image_b: &str) -> Result<Comparison, AdlensError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt::compare_prompt(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_a.to_string(),
                        },
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_b.to_string(),
                        },
                    },
                ],
            }],
            max_tokens: COMPARE_MAX_TOKENS,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        self.complete(&request).await
    }

    async fn complete<T: DeserializeOwned>(&self, request: &ChatRequest) -> Result<T, AdlensError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AdlensError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "vision response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdlensError::Provider {
                message: format!("vision API returned {status}: {body}"),
                source: None,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| AdlensError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| AdlensError::Provider {
                message: "no content received from vision provider".to_string(),
                source: None,
            })?;

        let stripped = strip_code_fences(content);
        serde_json::from_str(&stripped).map_err(|e| AdlensError::Provider {
            message: format!("vision response is not valid critique JSON: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Remove markdown code fences some models wrap JSON output in.
fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
