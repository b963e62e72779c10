// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vision/LLM provider integration.
//!
//! Sends marketing visuals to an OpenAI-compatible chat completions API and
//! parses the structured critique or A/B verdict out of the response.

pub mod client;
pub mod prompt;
pub mod sample;
pub mod types;

pub use client::VisionClient;
pub use sample::{sample_comparison, sample_critique};
pub use types::{BrandContext, Comparison, Critique, PlatformSpecifics, Recommendation};
