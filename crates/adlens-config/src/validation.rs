// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and a
//! positive daily quota.

use crate::diagnostic::ConfigError;
use crate::model::AdlensConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AdlensConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.quota.daily_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "quota.daily_limit must be at least 1, got {}",
                config.quota.daily_limit
            ),
        });
    }

    if config.vision.max_tokens < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vision.max_tokens must be at least 1, got {}",
                config.vision.max_tokens
            ),
        });
    }

    if config.vision.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "vision.base_url must not be empty".to_string(),
        });
    }

    if config.billing.api_base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "billing.api_base_url must not be empty".to_string(),
        });
    }

    // An empty-string secret is indistinguishable from a typo; require it to
    // be either absent or non-empty so the verifier can fail closed cleanly.
    if let Some(secret) = &config.billing.webhook_secret
        && secret.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "billing.webhook_secret must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
