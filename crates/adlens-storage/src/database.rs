// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use adlens_core::AdlensError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Handle to the SQLite database backing the service.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, AdlensError> {
        Self::open_with_options(path, true).await
    }

    /// Open with explicit WAL control (disabled only in constrained test setups).
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, AdlensError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(AdlensError::storage)?;
        }

        // PRAGMA setup and migrations run synchronously on a blocking thread
        // before the async connection takes over.
        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), AdlensError> {
            let mut conn =
                rusqlite::Connection::open(&setup_path).map_err(AdlensError::storage)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(AdlensError::storage)?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(AdlensError::storage)?;
            migrations::run_migrations(&mut conn).map_err(AdlensError::storage)?;
            Ok(())
        })
        .await
        .map_err(|e| AdlensError::Internal(format!("database setup task failed: {e}")))??;

        let conn = Connection::open(path).await.map_err(AdlensError::storage)?;

        // Per-connection PRAGMAs for the long-lived async connection.
        conn.call(move |conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), AdlensError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the crate-wide storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> AdlensError {
    AdlensError::Storage {
        source: Box::new(e),
    }
}
