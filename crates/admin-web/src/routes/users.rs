//! User, role and session-token management routes.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Duration;
use database::profile::ProfileWithRole;
use database::{now_rfc3339, profile, role, session, Profile, Role};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::error::{AdminError, Result};
use crate::state::AppState;

/// A user row for the back-office list.
#[derive(Serialize)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub role: Role,
    pub created_at: String,
}

impl From<ProfileWithRole> for UserRow {
    fn from(row: ProfileWithRole) -> Self {
        Self {
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            company_name: row.company_name,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// List all users with their roles.
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserRow>>> {
    let rows = profile::list_profiles_with_roles(state.db.pool()).await?;
    Ok(Json(rows.into_iter().map(UserRow::from).collect()))
}

/// Request to create a user.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub role: Role,
}

/// Response carrying the new user's ID.
#[derive(Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user_id: String,
}

/// Create a user: profile plus role row.
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let user_id = Uuid::new_v4().to_string();
    let now = now_rfc3339();

    profile::create_profile(
        state.db.pool(),
        &Profile {
            user_id: user_id.clone(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            company_name: req.company_name,
            avatar_url: None,
            created_at: now.clone(),
            updated_at: now,
        },
    )
    .await?;
    role::set_role(state.db.pool(), &user_id, req.role).await?;

    info!(user = %user_id, role = %req.role, admin = %admin.user_id(), "User created");
    Ok(Json(CreateUserResponse {
        success: true,
        user_id,
    }))
}

/// Request to change a user's role.
#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

/// Success envelope.
#[derive(Serialize)]
pub struct Done {
    pub success: bool,
}

/// Set a user's role.
pub async fn set_role(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> Result<Json<Done>> {
    // Refuse a role for a user that does not exist.
    profile::get_profile(state.db.pool(), &user_id).await?;
    role::set_role(state.db.pool(), &user_id, req.role).await?;

    info!(user = %user_id, role = %req.role, admin = %admin.user_id(), "Role updated");
    Ok(Json(Done { success: true }))
}

/// Request to issue a bearer token for a user.
#[derive(Deserialize)]
pub struct IssueSessionRequest {
    pub user_id: String,
    /// Token lifetime in hours; defaults to 30 days.
    pub ttl_hours: Option<i64>,
}

/// Response carrying the clear token, shown exactly once.
#[derive(Serialize)]
pub struct IssueSessionResponse {
    pub success: bool,
    pub session_id: String,
    pub token: String,
    pub expires_at: String,
}

/// Default token lifetime.
const DEFAULT_TTL_HOURS: i64 = 24 * 30;

/// Issue a bearer token for a user.
pub async fn issue_session(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(req): Json<IssueSessionRequest>,
) -> Result<Json<IssueSessionResponse>> {
    // The user must exist with a role before a token makes sense.
    profile::get_profile(state.db.pool(), &req.user_id).await?;
    role::get_role(state.db.pool(), &req.user_id).await?;

    let ttl_hours = req.ttl_hours.unwrap_or(DEFAULT_TTL_HOURS);
    if ttl_hours <= 0 {
        return Err(AdminError::BadRequest(
            "ttl_hours must be positive".to_string(),
        ));
    }

    let (stored, token) =
        session::issue_session(state.db.pool(), &req.user_id, Duration::hours(ttl_hours)).await?;

    info!(user = %req.user_id, admin = %admin.user_id(), "Session token issued");
    Ok(Json(IssueSessionResponse {
        success: true,
        session_id: stored.id,
        token,
        expires_at: stored.expires_at,
    }))
}

/// Revoke a session token.
pub async fn revoke_session(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Done>> {
    session::revoke_session(state.db.pool(), &id).await?;

    info!(session = %id, admin = %admin.user_id(), "Session revoked");
    Ok(Json(Done { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{admin_auth, test_state};
    use database::DatabaseError;

    #[tokio::test]
    async fn test_create_user_and_issue_token() {
        let state = test_state().await;
        let admin = admin_auth(&state).await;

        let created = create(
            State(state.clone()),
            admin.clone(),
            Json(CreateUserRequest {
                first_name: "Nina".to_string(),
                last_name: "Marsh".to_string(),
                email: "nina@example.com".to_string(),
                phone: None,
                company_name: None,
                role: Role::Client,
            }),
        )
        .await
        .unwrap();

        let issued = issue_session(
            State(state.clone()),
            admin,
            Json(IssueSessionRequest {
                user_id: created.0.user_id.clone(),
                ttl_hours: Some(1),
            }),
        )
        .await
        .unwrap();

        let auth = session::resolve_token(state.db.pool(), &issued.0.token)
            .await
            .unwrap();
        assert_eq!(auth.user_id, created.0.user_id);
        assert_eq!(auth.role, Role::Client);
    }

    #[tokio::test]
    async fn test_issue_token_for_unknown_user_fails() {
        let state = test_state().await;
        let admin = admin_auth(&state).await;

        let result = issue_session(
            State(state),
            admin,
            Json(IssueSessionRequest {
                user_id: "ghost".to_string(),
                ttl_hours: None,
            }),
        )
        .await;
        assert!(matches!(
            result,
            Err(AdminError::Database(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let state = test_state().await;
        let admin = admin_auth(&state).await;

        let result = create(
            State(state),
            admin,
            Json(CreateUserRequest {
                first_name: "No".to_string(),
                last_name: "Email".to_string(),
                email: "not-an-email".to_string(),
                phone: None,
                company_name: None,
                role: Role::Client,
            }),
        )
        .await;
        assert!(matches!(
            result,
            Err(AdminError::Database(DatabaseError::Validation(_)))
        ));
    }
}
