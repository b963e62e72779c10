// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./adlens.toml` > `~/.config/adlens/adlens.toml` > `/etc/adlens/adlens.toml`
//! with environment variable overrides via `ADLENS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AdlensConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/adlens/adlens.toml` (system-wide)
/// 3. `~/.config/adlens/adlens.toml` (user XDG config)
/// 4. `./adlens.toml` (local directory)
/// 5. `ADLENS_*` environment variables
pub fn load_config() -> Result<AdlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdlensConfig::default()))
        .merge(Toml::file("/etc/adlens/adlens.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("adlens/adlens.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("adlens.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AdlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdlensConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AdlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdlensConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. `ADLENS_BILLING_WEBHOOK_SECRET` must map
/// to `billing.webhook_secret`, not `billing.webhook.secret`.
fn env_provider() -> Env {
    Env::prefixed("ADLENS_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ADLENS_BILLING_WEBHOOK_SECRET -> "billing_webhook_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("billing_", "billing.", 1)
            .replacen("vision_", "vision.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("notify_", "notify.", 1)
            .replacen("quota_", "quota.", 1);
        mapped.into()
    })
}
