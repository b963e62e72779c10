// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature verification.
//!
//! The signature is an HMAC-SHA256 hex digest of the raw request body.
//! Verification must run against the exact bytes received; re-serializing
//! the payload can change byte layout and invalidate the signature.

use adlens_core::AdlensError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a payment-provider webhook signature.
///
/// Computes HMAC-SHA256 over `body` with `secret`, hex-encodes it, and
/// compares against the supplied header value. Length is checked before any
/// value comparison, and the comparison itself is constant time; an early
/// exit on the first differing byte would leak how much of a forged
/// signature matches.
pub fn verify_signature(
    body: &[u8],
    signature_header: Option<&str>,
    secret: &str,
) -> Result<(), AdlensError> {
    let header = signature_header
        .ok_or_else(|| AdlensError::Unauthenticated("missing signature header".into()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AdlensError::Unauthenticated("invalid signature".into()))?;
    mac.update(body);
    let digest = hex::encode(mac.finalize().into_bytes());

    if digest.len() != header.len() {
        return Err(AdlensError::Unauthenticated("invalid signature".into()));
    }

    ring::constant_time::verify_slices_are_equal(digest.as_bytes(), header.as_bytes())
        .map_err(|_| AdlensError::Unauthenticated("invalid signature".into()))
}

/// Compute the hex signature for a body. Exposed for tests and tooling that
/// need to produce valid signatures.
pub fn sign(body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
