// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook event payloads and their application to identity records.
//!
//! Events are transient: parsed from a verified body, applied (or ignored),
//! and dropped. The provider delivers at least once; application is a
//! full-field overwrite keyed by the correlated identity, so replays are
//! naturally idempotent and concurrent deliveries are last-write-wins under
//! the storage layer's per-row atomicity.

use std::fmt;

use adlens_core::AdlensError;
use adlens_storage::Store;
use serde::Deserialize;
use tracing::{info, warn};

/// A subscription lifecycle event as delivered by the payment provider.
///
/// Only `meta` is required; unrelated provider events may carry arbitrary
/// `data` shapes, which must still parse so they can be acknowledged.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionEvent {
    pub meta: EventMeta,
    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMeta {
    pub event_name: String,
    #[serde(default)]
    pub custom_data: Option<CustomData>,
}

/// Correlation data attached at checkout time.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomData {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub id: Option<IdValue>,
    #[serde(default)]
    pub attributes: Option<EventAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventAttributes {
    #[serde(default)]
    pub customer_id: Option<IdValue>,
    #[serde(default)]
    pub variant_id: Option<IdValue>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Provider identifiers arrive as JSON numbers or strings depending on the
/// field; both normalize to opaque strings locally.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Str(String),
    Num(i64),
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Str(s) => f.write_str(s),
            IdValue::Num(n) => write!(f, "{n}"),
        }
    }
}

/// Which state change an event name maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Created/updated/resumed: overwrite all subscription fields.
    Activation,
    /// Cancelled/expired: overwrite status only.
    Deactivation,
    /// Everything else is acknowledged without touching any record.
    Unhandled,
}

/// Classify a provider event name.
pub fn classify(event_name: &str) -> EventClass {
    match event_name {
        "subscription_created" | "subscription_updated" | "subscription_resumed" => {
            EventClass::Activation
        }
        "subscription_cancelled" | "subscription_expired" => EventClass::Deactivation,
        _ => EventClass::Unhandled,
    }
}

/// Outcome of applying a verified event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The identity record was updated.
    Updated,
    /// The event carried no correlation identifier; nothing to apply.
    NoCorrelation,
    /// The event name is not one this service reacts to.
    Unhandled,
}

/// Apply a verified event to the identity it correlates with.
///
/// `now` stamps `updated_at` on the mutated row.
pub async fn apply_event(
    store: &Store,
    event: &SubscriptionEvent,
    now: &str,
) -> Result<Applied, AdlensError> {
    let Some(user_id) = event
        .meta
        .custom_data
        .as_ref()
        .and_then(|c| c.user_id.as_deref())
    else {
        // Some provider events are unrelated to any local identity
        // (test pings, store-level notices). Acknowledge and move on.
        return Ok(Applied::NoCorrelation);
    };

    let event_name = event.meta.event_name.as_str();
    info!(event_name, user_id, "received webhook event");

    match classify(event_name) {
        EventClass::Activation => {
            let (subscription_id, attributes) = required_data(event)?;
            let customer_id = attributes
                .customer_id
                .as_ref()
                .ok_or_else(|| malformed("data.attributes.customer_id"))?
                .to_string();
            let variant_id = attributes
                .variant_id
                .as_ref()
                .ok_or_else(|| malformed("data.attributes.variant_id"))?
                .to_string();
            let status = attributes
                .status
                .as_deref()
                .ok_or_else(|| malformed("data.attributes.status"))?;

            store
                .apply_subscription(
                    user_id,
                    &subscription_id,
                    &customer_id,
                    &variant_id,
                    status,
                    now,
                )
                .await?;
            Ok(Applied::Updated)
        }
        EventClass::Deactivation => {
            let (_, attributes) = required_data(event)?;
            let status = attributes
                .status
                .as_deref()
                .ok_or_else(|| malformed("data.attributes.status"))?;

            let rows = store.set_subscription_status(user_id, status, now).await?;
            if rows == 0 {
                warn!(user_id, event_name, "deactivation for unknown identity");
            }
            Ok(Applied::Updated)
        }
        EventClass::Unhandled => Ok(Applied::Unhandled),
    }
}

fn required_data(event: &SubscriptionEvent) -> Result<(String, &EventAttributes), AdlensError> {
    let data = event.data.as_ref().ok_or_else(|| malformed("data"))?;
    let id = data.id.as_ref().ok_or_else(|| malformed("data.id"))?;
    let attributes = data
        .attributes
        .as_ref()
        .ok_or_else(|| malformed("data.attributes"))?;
    Ok((id.to_string(), attributes))
}

fn malformed(field: &str) -> AdlensError {
    AdlensError::Internal(format!("webhook payload missing {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adlens_config::model::StorageConfig;
    use tempfile::tempdir;

    const NOW: &str = "2024-05-01T12:00:00.000Z";

    async fn setup_store() -> (Store, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("events.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        (Store::open(&config).await.unwrap(), dir)
    }

    fn event_json(event_name: &str, user_id: Option<&str>) -> String {
        let custom = match user_id {
            Some(id) => format!(r#","custom_data":{{"user_id":"{id}"}}"#),
            None => String::new(),
        };
        format!(
            r#"{{
                "meta": {{"event_name": "{event_name}"{custom}}},
                "data": {{
                    "id": "sub-314",
                    "attributes": {{
                        "customer_id": 8675309,
                        "variant_id": 42,
                        "status": "active"
                    }}
                }}
            }}"#
        )
    }

    #[test]
    fn classify_covers_both_event_classes() {
        assert_eq!(classify("subscription_created"), EventClass::Activation);
        assert_eq!(classify("subscription_updated"), EventClass::Activation);
        assert_eq!(classify("subscription_resumed"), EventClass::Activation);
        assert_eq!(classify("subscription_cancelled"), EventClass::Deactivation);
        assert_eq!(classify("subscription_expired"), EventClass::Deactivation);
        assert_eq!(classify("order_created"), EventClass::Unhandled);
        assert_eq!(classify(""), EventClass::Unhandled);
    }

    #[test]
    fn numeric_provider_ids_normalize_to_strings() {
        let event: SubscriptionEvent =
            serde_json::from_str(&event_json("subscription_created", Some("u1"))).unwrap();
        let attributes = event.data.unwrap().attributes.unwrap();
        assert_eq!(attributes.customer_id.unwrap().to_string(), "8675309");
        assert_eq!(attributes.variant_id.unwrap().to_string(), "42");
    }

    #[test]
    fn unrelated_event_shape_still_parses() {
        let json = r#"{"meta":{"event_name":"order_created"},"data":{"id":1,"attributes":{"total":990}}}"#;
        let event: SubscriptionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(classify(&event.meta.event_name), EventClass::Unhandled);
    }

    #[tokio::test]
    async fn activation_upserts_all_subscription_fields() {
        let (store, _dir) = setup_store().await;
        let event: SubscriptionEvent =
            serde_json::from_str(&event_json("subscription_created", Some("u1"))).unwrap();

        let applied = apply_event(&store, &event, NOW).await.unwrap();
        assert_eq!(applied, Applied::Updated);

        let user = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(user.subscription_id.as_deref(), Some("sub-314"));
        assert_eq!(user.customer_id.as_deref(), Some("8675309"));
        assert_eq!(user.variant_id.as_deref(), Some("42"));
        assert_eq!(user.status.as_deref(), Some("active"));
    }

    #[tokio::test]
    async fn replaying_the_same_event_is_idempotent() {
        let (store, _dir) = setup_store().await;
        let event: SubscriptionEvent =
            serde_json::from_str(&event_json("subscription_updated", Some("u1"))).unwrap();

        apply_event(&store, &event, NOW).await.unwrap();
        let first = store.get_user("u1").await.unwrap().unwrap();

        apply_event(&store, &event, NOW).await.unwrap();
        let second = store.get_user("u1").await.unwrap().unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn deactivation_overwrites_status_only() {
        let (store, _dir) = setup_store().await;
        let created: SubscriptionEvent =
            serde_json::from_str(&event_json("subscription_created", Some("u1"))).unwrap();
        apply_event(&store, &created, NOW).await.unwrap();

        let cancelled_json = r#"{
            "meta": {"event_name": "subscription_cancelled", "custom_data": {"user_id": "u1"}},
            "data": {"id": "sub-314", "attributes": {"customer_id": 8675309, "variant_id": 42, "status": "cancelled"}}
        }"#;
        let cancelled: SubscriptionEvent = serde_json::from_str(cancelled_json).unwrap();
        let applied = apply_event(&store, &cancelled, "2024-05-02T00:00:00.000Z")
            .await
            .unwrap();
        assert_eq!(applied, Applied::Updated);

        let user = store.get_user("u1").await.unwrap().unwrap();
        assert_eq!(user.status.as_deref(), Some("cancelled"));
        // Identifier fields survive the deactivation.
        assert_eq!(user.subscription_id.as_deref(), Some("sub-314"));
        assert_eq!(user.customer_id.as_deref(), Some("8675309"));
    }

    #[tokio::test]
    async fn event_without_correlation_id_is_acknowledged_without_mutation() {
        let (store, _dir) = setup_store().await;
        let event: SubscriptionEvent =
            serde_json::from_str(&event_json("subscription_created", None)).unwrap();

        let applied = apply_event(&store, &event, NOW).await.unwrap();
        assert_eq!(applied, Applied::NoCorrelation);
        assert!(store.get_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unhandled_event_is_acknowledged_without_mutation() {
        let (store, _dir) = setup_store().await;
        let json = r#"{"meta":{"event_name":"order_refunded","custom_data":{"user_id":"u1"}}}"#;
        let event: SubscriptionEvent = serde_json::from_str(json).unwrap();

        let applied = apply_event(&store, &event, NOW).await.unwrap();
        assert_eq!(applied, Applied::Unhandled);
        assert!(store.get_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn activation_with_missing_attributes_errors() {
        let (store, _dir) = setup_store().await;
        let json = r#"{"meta":{"event_name":"subscription_created","custom_data":{"user_id":"u1"}},"data":{"id":"sub-1"}}"#;
        let event: SubscriptionEvent = serde_json::from_str(json).unwrap();

        let err = apply_event(&store, &event, NOW).await.unwrap_err();
        assert!(matches!(err, AdlensError::Internal(_)));
        assert!(store.get_user("u1").await.unwrap().is_none());
    }
}
