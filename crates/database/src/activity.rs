//! Application activity feed.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::models::ActivityEntry;
use crate::now_rfc3339;

/// Append an activity entry for an application.
///
/// Takes a connection rather than the pool so transitions can write their
/// activity in the same transaction as the row they change.
pub async fn record(conn: &mut SqliteConnection, loan_id: &str, message: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO activity_log (loan_id, message, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(loan_id)
    .bind(message)
    .bind(now_rfc3339())
    .execute(conn)
    .await?;

    Ok(())
}

/// List activity for an application, newest first.
pub async fn list_for_loan(pool: &SqlitePool, loan_id: &str) -> Result<Vec<ActivityEntry>> {
    let entries = sqlx::query_as::<_, ActivityEntry>(
        r#"
        SELECT id, loan_id, message, created_at
        FROM activity_log
        WHERE loan_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(loan_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// List the most recent activity across all applications.
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<ActivityEntry>> {
    let entries = sqlx::query_as::<_, ActivityEntry>(
        r#"
        SELECT id, loan_id, message, created_at
        FROM activity_log
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
