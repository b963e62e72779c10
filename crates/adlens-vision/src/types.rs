// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured critique types and the provider wire format.
//!
//! The critique JSON shape (camelCase keys) is the public API contract;
//! clients and the persisted `result` column both carry it verbatim.

use serde::{Deserialize, Serialize};

/// Brand context a user may attach to an analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandContext {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub colors: Option<String>,
    #[serde(default)]
    pub fonts: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A structured marketing critique of one visual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Critique {
    /// Overall marketing impact, 0-100.
    pub score: i64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_specifics: Option<PlatformSpecifics>,
}

/// One actionable suggestion within a critique.
///
/// `category` and `impact` are provider-chosen labels (`style`/`content`/
/// `structure`/`color`, `high`/`medium`/`low`); kept as strings since the
/// model output is not schema-enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestion: String,
    pub impact: String,
}

/// Platform-targeted tips attached to a critique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpecifics {
    pub platform: String,
    pub tips: Vec<String>,
}

/// A/B comparison verdict between two visuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// "A" or "B".
    pub winner: String,
    pub score_a: i64,
    pub score_b: i64,
    pub reasoning: String,
    pub key_diffs: Vec<String>,
}

// --- Provider wire format (OpenAI-compatible chat completions) ---

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}
