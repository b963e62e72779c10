// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-level store facade over the typed query modules.

use adlens_config::model::StorageConfig;
use tracing::debug;

use adlens_core::AdlensError;

use crate::database::Database;
use crate::models::{Analysis, User};
use crate::queries;

/// SQLite-backed store for identity and usage records.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. Cheap to share behind an `Arc`; all writes serialize
/// through the single connection thread.
pub struct Store {
    db: Database,
}

impl Store {
    /// Open the store at the configured path, running migrations if needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, AdlensError> {
        let db = Database::open_with_options(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "store opened");
        Ok(Self { db })
    }

    /// Checkpoint and release the underlying connection.
    pub async fn close(&self) -> Result<(), AdlensError> {
        self.db.close().await
    }

    // --- Identity operations ---

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AdlensError> {
        queries::users::get_user(&self.db, id).await
    }

    pub async fn ensure_user(&self, id: &str, email: &str, now: &str) -> Result<(), AdlensError> {
        queries::users::ensure_user(&self.db, id, email, now).await
    }

    pub async fn subscription_status(&self, id: &str) -> Result<Option<String>, AdlensError> {
        queries::users::subscription_status(&self.db, id).await
    }

    pub async fn apply_subscription(
        &self,
        id: &str,
        subscription_id: &str,
        customer_id: &str,
        variant_id: &str,
        status: &str,
        now: &str,
    ) -> Result<(), AdlensError> {
        queries::users::apply_subscription(
            &self.db,
            id,
            subscription_id,
            customer_id,
            variant_id,
            status,
            now,
        )
        .await
    }

    pub async fn set_subscription_status(
        &self,
        id: &str,
        status: &str,
        now: &str,
    ) -> Result<usize, AdlensError> {
        queries::users::set_subscription_status(&self.db, id, status, now).await
    }

    // --- Usage operations ---

    pub async fn insert_analysis(&self, analysis: &Analysis) -> Result<(), AdlensError> {
        queries::analyses::insert_analysis(&self.db, analysis).await
    }

    pub async fn count_analyses_in_window(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> Result<i64, AdlensError> {
        queries::analyses::count_in_window(&self.db, user_id, start, end).await
    }

    pub async fn list_analyses(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Analysis>, AdlensError> {
        queries::analyses::list_for_user(&self.db, user_id, limit).await
    }

    pub async fn get_analysis(&self, id: &str) -> Result<Option<Analysis>, AdlensError> {
        queries::analyses::get_analysis(&self.db, id).await
    }
}
