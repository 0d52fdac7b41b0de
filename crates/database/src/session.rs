//! Bearer session issue, lookup and revocation.
//!
//! Tokens are opaque random strings handed out once at issue time; only
//! their SHA-256 digest is stored. Authorization is still decided by the
//! `user_roles` row on every request, never by anything inside the token.

use chrono::{Duration, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Role, Session};
use crate::now_rfc3339;

/// Hex SHA-256 digest of a bearer token.
pub fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issue a session for a user.
///
/// Returns the stored row and the clear token; the token is not recoverable
/// afterwards.
pub async fn issue_session(
    pool: &SqlitePool,
    user_id: &str,
    ttl: Duration,
) -> Result<(Session, String)> {
    let token = format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );

    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        token_hash: token_hash(&token),
        created_at: now_rfc3339(),
        expires_at: (Utc::now() + ttl).to_rfc3339_opts(SecondsFormat::Micros, true),
    };

    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(&session.token_hash)
    .bind(&session.created_at)
    .bind(&session.expires_at)
    .execute(pool)
    .await?;

    tracing::info!(user = %user_id, session = %session.id, "Issued session token");

    Ok((session, token))
}

/// The request-scoped identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: Role,
}

/// Resolve a bearer token to a user and role.
///
/// Expired and unknown tokens both come back as `NotFound` so callers cannot
/// distinguish them.
pub async fn resolve_token(pool: &SqlitePool, token: &str) -> Result<AuthenticatedUser> {
    let row = sqlx::query_as::<_, (String, Role)>(
        r#"
        SELECT s.user_id, r.role
        FROM sessions s
        INNER JOIN user_roles r ON r.user_id = s.user_id
        WHERE s.token_hash = ? AND s.expires_at > ?
        "#,
    )
    .bind(token_hash(token))
    .bind(now_rfc3339())
    .fetch_optional(pool)
    .await?;

    match row {
        Some((user_id, role)) => Ok(AuthenticatedUser { user_id, role }),
        None => Err(DatabaseError::NotFound {
            entity: "Session",
            id: "bearer token".to_string(),
        }),
    }
}

/// Revoke a session by ID.
pub async fn revoke_session(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Session",
            id: id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::seed_user;
    use crate::test_db;

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let db = test_db().await;
        seed_user(db.pool(), "u1").await;

        let (session, token) = issue_session(db.pool(), "u1", Duration::hours(12))
            .await
            .unwrap();
        assert_eq!(session.token_hash, token_hash(&token));

        let auth = resolve_token(db.pool(), &token).await.unwrap();
        assert_eq!(auth.user_id, "u1");
        assert_eq!(auth.role, Role::Client);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let db = test_db().await;
        let result = resolve_token(db.pool(), "deadbeef").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let db = test_db().await;
        seed_user(db.pool(), "u1").await;

        let (_, token) = issue_session(db.pool(), "u1", Duration::seconds(-1))
            .await
            .unwrap();
        let result = resolve_token(db.pool(), &token).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let db = test_db().await;
        seed_user(db.pool(), "u1").await;

        let (session, token) = issue_session(db.pool(), "u1", Duration::hours(1))
            .await
            .unwrap();
        revoke_session(db.pool(), &session.id).await.unwrap();

        let result = resolve_token(db.pool(), &token).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
