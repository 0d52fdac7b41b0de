//! Profile CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Profile, Role};
use crate::{now_rfc3339, validation};

/// Create a new profile.
pub async fn create_profile(pool: &SqlitePool, profile: &Profile) -> Result<()> {
    validation::validate_required("first_name", &profile.first_name)?;
    validation::validate_required("last_name", &profile.last_name)?;
    validation::validate_email(&profile.email)?;

    sqlx::query(
        r#"
        INSERT INTO profiles
            (user_id, first_name, last_name, email, phone, company_name,
             avatar_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&profile.user_id)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(&profile.company_name)
    .bind(&profile.avatar_url)
    .bind(&profile.created_at)
    .bind(&profile.updated_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Profile",
                    id: profile.email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a profile by user ID.
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, first_name, last_name, email, phone, company_name,
               avatar_url, created_at, updated_at
        FROM profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Profile",
        id: user_id.to_string(),
    })
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Update an existing profile.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    update: &ProfileUpdate,
) -> Result<Profile> {
    validation::validate_required("first_name", &update.first_name)?;
    validation::validate_required("last_name", &update.last_name)?;
    validation::validate_email(&update.email)?;

    let now = now_rfc3339();
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET first_name = ?, last_name = ?, email = ?, phone = ?,
            company_name = ?, avatar_url = ?, updated_at = ?
        WHERE user_id = ?
        "#,
    )
    .bind(&update.first_name)
    .bind(&update.last_name)
    .bind(&update.email)
    .bind(&update.phone)
    .bind(&update.company_name)
    .bind(&update.avatar_url)
    .bind(&now)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Profile",
            id: user_id.to_string(),
        });
    }

    get_profile(pool, user_id).await
}

/// A profile joined with its role row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileWithRole {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub role: Role,
    pub created_at: String,
}

/// List all profiles with their roles, newest first.
pub async fn list_profiles_with_roles(pool: &SqlitePool) -> Result<Vec<ProfileWithRole>> {
    let rows = sqlx::query_as::<_, ProfileWithRole>(
        r#"
        SELECT p.user_id, p.first_name, p.last_name, p.email, p.phone,
               p.company_name, r.role, p.created_at
        FROM profiles p
        INNER JOIN user_roles r ON r.user_id = p.user_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count total profiles.
pub async fn count_profiles(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM profiles
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    fn sample_profile(user_id: &str, email: &str) -> Profile {
        Profile {
            user_id: user_id.to_string(),
            first_name: "Maya".to_string(),
            last_name: "Okafor".to_string(),
            email: email.to_string(),
            phone: None,
            company_name: Some("Okafor Holdings Ltd".to_string()),
            avatar_url: None,
            created_at: now_rfc3339(),
            updated_at: now_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_db().await;
        create_profile(db.pool(), &sample_profile("u1", "maya@example.com"))
            .await
            .unwrap();

        let result = create_profile(db.pool(), &sample_profile("u2", "maya@example.com")).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_validates_email() {
        let db = test_db().await;
        create_profile(db.pool(), &sample_profile("u1", "maya@example.com"))
            .await
            .unwrap();

        let result = update_profile(
            db.pool(),
            "u1",
            &ProfileUpdate {
                first_name: "Maya".to_string(),
                last_name: "Okafor".to_string(),
                email: "not-an-email".to_string(),
                phone: None,
                company_name: None,
                avatar_url: None,
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let db = test_db().await;
        let result = update_profile(
            db.pool(),
            "nobody",
            &ProfileUpdate {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@b.co".to_string(),
                phone: None,
                company_name: None,
                avatar_url: None,
            },
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
