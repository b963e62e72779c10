// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The entitlement gate: decides whether a metered analysis may proceed
//! today for a given identity.
//!
//! Identity and clock are explicit parameters so the anonymous branch and
//! the midnight rollover are plain, testable inputs. The gate itself
//! performs no writes; the caller records the usage row after the gated
//! action succeeds.

use std::sync::Arc;

use adlens_config::model::QuotaConfig;
use adlens_core::types::format_timestamp;
use adlens_core::{AdlensError, SUBSCRIPTION_ACTIVE};
use adlens_storage::Store;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use tracing::debug;

/// Gate over the free-tier daily quota.
pub struct EntitlementGate {
    store: Arc<Store>,
    daily_limit: u32,
}

impl EntitlementGate {
    pub fn new(store: Arc<Store>, quota: &QuotaConfig) -> Self {
        Self {
            store,
            daily_limit: quota.daily_limit,
        }
    }

    /// Decide whether a new analysis is permitted at `now`.
    ///
    /// - Anonymous requests are allowed unconditionally (only identified
    ///   free users are metered).
    /// - An identity with an `active` subscription bypasses the count.
    /// - Otherwise the identity's usage inside the current local calendar
    ///   day is counted; reaching the limit rejects with
    ///   [`AdlensError::QuotaExceeded`].
    ///
    /// A failing status lookup or count propagates as a storage error; it is
    /// never treated as an allow.
    pub async fn check(
        &self,
        identity: Option<&str>,
        now: DateTime<Local>,
    ) -> Result<(), AdlensError> {
        self.check_on_day(identity, now.date_naive(), now.offset().fix())
            .await
    }

    /// Window-explicit variant of [`check`](Self::check); `date` and
    /// `offset` name the local calendar day being metered.
    pub async fn check_on_day(
        &self,
        identity: Option<&str>,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> Result<(), AdlensError> {
        let Some(user_id) = identity else {
            return Ok(());
        };

        let status = self.store.subscription_status(user_id).await?;
        if status.as_deref() == Some(SUBSCRIPTION_ACTIVE) {
            return Ok(());
        }

        let (start, end) = day_window(date, offset);
        let used = self
            .store
            .count_analyses_in_window(user_id, &start, &end)
            .await?;
        debug!(user_id, used, limit = self.daily_limit, "quota check");

        if used >= i64::from(self.daily_limit) {
            return Err(AdlensError::QuotaExceeded {
                limit: self.daily_limit,
            });
        }
        Ok(())
    }
}

/// The inclusive `[00:00:00.000, 23:59:59.999]` window of the local calendar
/// day `date` at `offset`, rendered as UTC column-format bounds.
pub fn day_window(date: NaiveDate, offset: FixedOffset) -> (String, String) {
    let start = at_local(date, 0, 0, 0, 0, offset);
    let end = at_local(date, 23, 59, 59, 999, offset);
    (format_timestamp(start), format_timestamp(end))
}

/// Convert a wall-clock instant on `date` at a fixed offset into UTC.
fn at_local(date: NaiveDate, h: u32, m: u32, s: u32, ms: u32, offset: FixedOffset) -> DateTime<Utc> {
    let naive = date
        .and_hms_milli_opt(h, m, s, ms)
        .expect("in-range time components");
    let shifted = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&shifted)
}
