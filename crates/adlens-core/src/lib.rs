// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Adlens service.
//!
//! Provides the shared error type and the domain records (identity and
//! usage) used by the storage, billing, and gateway crates.

pub mod error;
pub mod types;

pub use error::AdlensError;
pub use types::{format_timestamp, now_timestamp, Analysis, User, SUBSCRIPTION_ACTIVE};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_render_messages() {
        let quota = AdlensError::QuotaExceeded { limit: 3 };
        assert_eq!(quota.to_string(), "daily limit of 3 analyses reached");

        let auth = AdlensError::Unauthenticated("invalid signature".into());
        assert!(auth.to_string().contains("invalid signature"));

        let misconfig = AdlensError::Misconfigured("webhook secret not set".into());
        assert!(misconfig.to_string().starts_with("server misconfigured"));

        let storage = AdlensError::storage(std::io::Error::other("disk gone"));
        assert!(storage.to_string().contains("disk gone"));
    }

    #[test]
    fn quota_error_is_distinguishable() {
        // The gate's rejection must be matchable, not just a string.
        let err = AdlensError::QuotaExceeded { limit: 3 };
        assert!(matches!(err, AdlensError::QuotaExceeded { limit: 3 }));
    }
}
