// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Adlens service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Adlens configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
/// Secrets are read into this struct once at startup and passed by reference
/// into the components that need them; nothing reads the process environment
/// at request time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdlensConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Payment provider settings (API key, store, webhook secret).
    #[serde(default)]
    pub billing: BillingConfig,

    /// Vision/LLM provider settings.
    #[serde(default)]
    pub vision: VisionConfig,

    /// Session verification against the external auth provider.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Outbound result notification settings.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Free-tier quota settings.
    #[serde(default)]
    pub quota: QuotaConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("adlens").join("adlens.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("adlens.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Payment provider configuration.
///
/// Every credential is optional at load time; operations that need an unset
/// one fail with a misconfiguration error rather than falling back.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BillingConfig {
    /// Provider API key for checkout/customer calls.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Store identifier assigned by the provider.
    #[serde(default)]
    pub store_id: Option<String>,

    /// Product variant identifier used for new checkouts.
    #[serde(default)]
    pub variant_id: Option<String>,

    /// Shared secret for webhook signature verification.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Provider API base URL.
    #[serde(default = "default_billing_base_url")]
    pub api_base_url: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            store_id: None,
            variant_id: None,
            webhook_secret: None,
            api_base_url: default_billing_base_url(),
        }
    }
}

fn default_billing_base_url() -> String {
    "https://api.lemonsqueezy.com".to_string()
}

/// Vision/LLM provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VisionConfig {
    /// Provider API key. `None` makes every analysis fall back to the sample critique.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for critique requests.
    #[serde(default = "default_vision_model")]
    pub model: String,

    /// Maximum tokens to generate per critique.
    #[serde(default = "default_vision_max_tokens")]
    pub max_tokens: u32,

    /// Provider API base URL.
    #[serde(default = "default_vision_base_url")]
    pub base_url: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_vision_model(),
            max_tokens: default_vision_max_tokens(),
            base_url: default_vision_base_url(),
        }
    }
}

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_vision_max_tokens() -> u32 {
    1000
}

fn default_vision_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Auth provider session verification configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Session verification endpoint. `None` treats every request as anonymous.
    #[serde(default)]
    pub verify_url: Option<String>,
}

/// Outbound result notification configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// URL to POST completed analyses to. `None` disables notification.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Free-tier quota configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaConfig {
    /// Analyses allowed per identity per local calendar day on the free tier.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
        }
    }
}

fn default_daily_limit() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = AdlensConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_level, "info");
        assert!(config.storage.wal_mode);
        assert!(config.billing.webhook_secret.is_none());
        assert_eq!(config.vision.model, "gpt-4o");
        assert_eq!(config.vision.max_tokens, 1000);
        assert_eq!(config.quota.daily_limit, 3);
        assert!(config.auth.verify_url.is_none());
        assert!(config.notify.webhook_url.is_none());
    }

    #[test]
    fn unknown_top_level_section_is_rejected() {
        let toml_str = r#"
[serverr]
host = "0.0.0.0"
"#;
        let result = toml::from_str::<AdlensConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_in_section_is_rejected() {
        let toml_str = r#"
[quota]
dayly_limit = 5
"#;
        let result = toml::from_str::<AdlensConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn billing_section_deserializes() {
        let toml_str = r#"
[billing]
api_key = "ls_test_key"
store_id = "12345"
variant_id = "67890"
webhook_secret = "whsec"
"#;
        let config: AdlensConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.billing.api_key.as_deref(), Some("ls_test_key"));
        assert_eq!(config.billing.store_id.as_deref(), Some("12345"));
        assert_eq!(config.billing.variant_id.as_deref(), Some("67890"));
        assert_eq!(config.billing.webhook_secret.as_deref(), Some("whsec"));
        assert_eq!(config.billing.api_base_url, "https://api.lemonsqueezy.com");
    }
}
