// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row models for the storage layer.
//!
//! The domain records live in `adlens-core`; the query modules map rows
//! directly onto them.

pub use adlens_core::types::{Analysis, User};
