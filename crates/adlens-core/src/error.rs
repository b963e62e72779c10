// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Adlens service.

use thiserror::Error;

/// The primary error type used across all Adlens crates.
#[derive(Debug, Error)]
pub enum AdlensError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required secret or credential is absent at the time an operation needs it.
    /// Surfaced as a server error; never downgraded to "trust anyway".
    #[error("server misconfigured: {0}")]
    Misconfigured(String),

    /// Request could not be authenticated (missing or invalid signature/token).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The free-tier daily quota is exhausted. Distinguishable from generic
    /// failure so callers can route to an upgrade flow.
    #[error("daily limit of {limit} analyses reached")]
    QuotaExceeded { limit: u32 },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Vision/LLM provider errors (API failure, malformed response, token limits).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Payment provider API errors (checkout creation, customer lookup).
    #[error("billing error: {message}")]
    Billing {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdlensError {
    /// Wrap an arbitrary error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AdlensError::Storage {
            source: Box::new(source),
        }
    }
}
