// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Adlens service.
//!
//! Identity records and usage records live here; webhook events are
//! transient and never persisted.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::Store;
