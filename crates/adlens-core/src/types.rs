// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Adlens crates.
//!
//! Timestamps are ISO-8601 UTC strings with millisecond precision
//! (`2026-01-01T00:00:00.000Z`), matching the storage layer's column format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Render a timestamp in the shared column format:
/// ISO-8601 UTC with millisecond precision.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Current time in the shared column format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Subscription status value that grants unlimited usage.
///
/// Any other value (or an absent identity row) means the free tier applies.
pub const SUBSCRIPTION_ACTIVE: &str = "active";

/// A locally mirrored identity record, owned by the external auth provider.
///
/// The billing fields (`customer_id`, `subscription_id`, `variant_id`,
/// `status`) stay `None` until a subscription webhook is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub variant_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// True when the identity holds an active paid subscription.
    pub fn is_subscribed(&self) -> bool {
        self.status.as_deref() == Some(SUBSCRIPTION_ACTIVE)
    }
}

/// One persisted usage record: a completed image critique.
///
/// Written exactly once per successful metered action, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    pub user_id: String,
    /// Truncated reference to the submitted image (not the full payload).
    pub image_ref: String,
    pub score: i64,
    pub summary: String,
    /// Full structured critique as a JSON document.
    pub result: String,
    /// Brand context as submitted, if any.
    pub context: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(status: Option<&str>) -> User {
        User {
            id: "user-1".to_string(),
            email: "u@example.com".to_string(),
            status: status.map(String::from),
            customer_id: None,
            subscription_id: None,
            variant_id: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn active_status_is_subscribed() {
        assert!(make_user(Some("active")).is_subscribed());
    }

    #[test]
    fn any_other_status_is_not_subscribed() {
        assert!(!make_user(None).is_subscribed());
        assert!(!make_user(Some("cancelled")).is_subscribed());
        assert!(!make_user(Some("expired")).is_subscribed());
        assert!(!make_user(Some("past_due")).is_subscribed());
        // Sentinel comparison is exact, not case-insensitive.
        assert!(!make_user(Some("Active")).is_subscribed());
    }

    #[test]
    fn format_timestamp_has_millisecond_precision() {
        let ts = chrono::DateTime::parse_from_rfc3339("2024-05-01T23:59:59.999Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(format_timestamp(ts), "2024-05-01T23:59:59.999Z");
    }

    #[test]
    fn format_timestamp_pads_whole_seconds() {
        let ts = chrono::DateTime::parse_from_rfc3339("2024-05-02T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(format_timestamp(ts), "2024-05-02T00:00:00.000Z");
    }

    #[test]
    fn user_serde_roundtrip() {
        let user = make_user(Some("active"));
        let json = serde_json::to_string(&user).unwrap();
        let parsed: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user, parsed);
    }
}
