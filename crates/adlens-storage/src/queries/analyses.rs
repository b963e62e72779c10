// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage record queries.
//!
//! `created_at` is an ISO-8601 UTC string with millisecond precision, so
//! range predicates compare lexicographically and a window query needs no
//! date functions.

use adlens_core::AdlensError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Analysis;

fn row_to_analysis(row: &rusqlite::Row<'_>) -> Result<Analysis, rusqlite::Error> {
    Ok(Analysis {
        id: row.get(0)?,
        user_id: row.get(1)?,
        image_ref: row.get(2)?,
        score: row.get(3)?,
        summary: row.get(4)?,
        result: row.get(5)?,
        context: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a completed analysis. Rows are write-once.
pub async fn insert_analysis(db: &Database, analysis: &Analysis) -> Result<(), AdlensError> {
    let analysis = analysis.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO analyses (id, user_id, image_ref, score, summary, result, context, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    analysis.id,
                    analysis.user_id,
                    analysis.image_ref,
                    analysis.score,
                    analysis.summary,
                    analysis.result,
                    analysis.context,
                    analysis.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count an identity's analyses with `created_at` in `[start, end]`,
/// inclusive on both ends.
pub async fn count_in_window(
    db: &Database,
    user_id: &str,
    start: &str,
    end: &str,
) -> Result<i64, AdlensError> {
    let user_id = user_id.to_string();
    let start = start.to_string();
    let end = end.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM analyses
                 WHERE user_id = ?1 AND created_at >= ?2 AND created_at <= ?3",
                params![user_id, start, end],
                |row| row.get::<_, i64>(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List an identity's analyses, newest first.
pub async fn list_for_user(
    db: &Database,
    user_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Analysis>, AdlensError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut analyses = Vec::new();
            match limit {
                Some(limit) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, user_id, image_ref, score, summary, result, context, created_at
                         FROM analyses WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2",
                    )?;
                    let rows = stmt.query_map(params![user_id, limit], row_to_analysis)?;
                    for row in rows {
                        analyses.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, user_id, image_ref, score, summary, result, context, created_at
                         FROM analyses WHERE user_id = ?1 ORDER BY created_at DESC",
                    )?;
                    let rows = stmt.query_map(params![user_id], row_to_analysis)?;
                    for row in rows {
                        analyses.push(row?);
                    }
                }
            }
            Ok(analyses)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a single analysis by id.
pub async fn get_analysis(db: &Database, id: &str) -> Result<Option<Analysis>, AdlensError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, image_ref, score, summary, result, context, created_at
                 FROM analyses WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_analysis);
            match result {
                Ok(analysis) => Ok(Some(analysis)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
