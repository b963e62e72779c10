// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity record queries.

use adlens_core::AdlensError;
use rusqlite::params;

use crate::database::Database;
use crate::models::User;

/// Get an identity record by id.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, AdlensError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, status, customer_id, subscription_id, variant_id, created_at, updated_at
                 FROM users WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    status: row.get(2)?,
                    customer_id: row.get(3)?,
                    subscription_id: row.get(4)?,
                    variant_id: row.get(5)?,
                    created_at: row.get(6)?,
                    updated_at: row.get(7)?,
                })
            });
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Make sure an identity row exists, creating a bare one if needed.
///
/// Existing rows are left untouched; this never overwrites billing fields.
pub async fn ensure_user(
    db: &Database,
    id: &str,
    email: &str,
    now: &str,
) -> Result<(), AdlensError> {
    let id = id.to_string();
    let email = email.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(id) DO NOTHING",
                params![id, email, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch only the subscription status for an identity.
///
/// Returns `None` both when the row is absent and when the status column is
/// NULL; either way the identity is non-paying.
pub async fn subscription_status(db: &Database, id: &str) -> Result<Option<String>, AdlensError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT status FROM users WHERE id = ?1",
                params![id],
                |row| row.get::<_, Option<String>>(0),
            );
            match result {
                Ok(status) => Ok(status),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a subscription activation: full-field overwrite keyed by identity id.
///
/// Upserts so that a webhook arriving before the identity's first analysis
/// still lands. Applying the same event twice leaves the row identical.
#[allow(clippy::too_many_arguments)]
pub async fn apply_subscription(
    db: &Database,
    id: &str,
    subscription_id: &str,
    customer_id: &str,
    variant_id: &str,
    status: &str,
    now: &str,
) -> Result<(), AdlensError> {
    let id = id.to_string();
    let subscription_id = subscription_id.to_string();
    let customer_id = customer_id.to_string();
    let variant_id = variant_id.to_string();
    let status = status.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, status, customer_id, subscription_id, variant_id, created_at, updated_at)
                 VALUES (?1, '', ?2, ?3, ?4, ?5, ?6, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     status = excluded.status,
                     customer_id = excluded.customer_id,
                     subscription_id = excluded.subscription_id,
                     variant_id = excluded.variant_id,
                     updated_at = excluded.updated_at",
                params![id, status, customer_id, subscription_id, variant_id, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite only the subscription status (deactivation events).
///
/// Returns the number of rows updated; 0 means the identity was never mirrored.
pub async fn set_subscription_status(
    db: &Database,
    id: &str,
    status: &str,
    now: &str,
) -> Result<usize, AdlensError> {
    let id = id.to_string();
    let status = status.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let rows = conn.execute(
                "UPDATE users SET status = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, status, now],
            )?;
            Ok(rows)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
