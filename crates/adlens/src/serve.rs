// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adlens serve` command implementation.
//!
//! Builds every component once from the validated config struct -- store,
//! entitlement gate, billing and vision clients, auth resolver, notifier --
//! and hands them to the gateway as explicit state. Nothing reads the
//! process environment after this point.

use std::sync::Arc;

use adlens_billing::{BillingClient, EntitlementGate};
use adlens_config::AdlensConfig;
use adlens_core::AdlensError;
use adlens_gateway::{start_server, AuthClient, GatewayState, HealthState, Notifier};
use adlens_storage::Store;
use adlens_vision::VisionClient;
use tracing::{info, warn};

/// Runs the `adlens serve` command.
pub async fn run_serve(config: AdlensConfig) -> Result<(), AdlensError> {
    init_tracing(&config.server.log_level);

    info!("starting adlens serve");

    let store = Arc::new(Store::open(&config.storage).await?);
    let gate = Arc::new(EntitlementGate::new(store.clone(), &config.quota));
    let billing = Arc::new(BillingClient::new(config.billing.clone())?);

    let vision = match VisionClient::new(&config.vision) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "vision provider unavailable; analyses will serve sample results");
            None
        }
    };

    let auth = AuthClient::new(&config.auth)?;
    if config.auth.verify_url.is_none() {
        warn!("auth.verify_url not set; all requests will be treated as anonymous");
    }

    let notifier = Notifier::from_config(&config.notify);

    if config.billing.webhook_secret.is_none() {
        warn!("billing.webhook_secret not set; webhook deliveries will be rejected");
    }

    let state = GatewayState {
        store,
        gate,
        billing,
        vision,
        auth,
        notifier,
        webhook_secret: config.billing.webhook_secret.clone(),
        health: HealthState {
            start_time: std::time::Instant::now(),
        },
    };

    start_server(&config.server, state).await
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level so operators can
/// raise verbosity without touching the config file.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
