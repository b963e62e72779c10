// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage entitlement and payment-provider integration.
//!
//! Two independent flows live here:
//! - the entitlement gate, deciding whether a metered analysis may proceed
//!   today for a given identity, and
//! - the webhook integrity verifier plus event application, authenticating
//!   provider notifications before they mutate subscription state.
//!
//! They share only the identity record as a data dependency.

pub mod entitlement;
pub mod events;
pub mod portal;
pub mod webhook;

pub use entitlement::{day_window, EntitlementGate};
pub use events::{apply_event, classify, Applied, EventClass, SubscriptionEvent};
pub use portal::BillingClient;
pub use webhook::verify_signature;
