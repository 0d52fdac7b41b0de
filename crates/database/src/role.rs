//! User role lookup and assignment.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Role;

/// Get the role for a user.
pub async fn get_role(pool: &SqlitePool, user_id: &str) -> Result<Role> {
    sqlx::query_scalar::<_, Role>(
        r#"
        SELECT role
        FROM user_roles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "UserRole",
        id: user_id.to_string(),
    })
}

/// Set (or replace) the role for a user.
pub async fn set_role(pool: &SqlitePool, user_id: &str, role: Role) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role)
        VALUES (?, ?)
        ON CONFLICT (user_id) DO UPDATE SET role = excluded.role
        "#,
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::seed_user;
    use crate::test_db;

    #[tokio::test]
    async fn test_role_replace() {
        let db = test_db().await;
        seed_user(db.pool(), "u1").await;

        assert_eq!(get_role(db.pool(), "u1").await.unwrap(), Role::Client);

        set_role(db.pool(), "u1", Role::Admin).await.unwrap();
        assert_eq!(get_role(db.pool(), "u1").await.unwrap(), Role::Admin);
    }

    #[tokio::test]
    async fn test_missing_role() {
        let db = test_db().await;
        let result = get_role(db.pool(), "ghost").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
