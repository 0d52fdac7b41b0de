//! Application management routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{
    activity, application, document, profile, ActivityEntry, LoanApplication, LoanDocument,
    LoanStatus,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AdminUser;
use crate::error::Result;
use crate::state::AppState;

/// An application row with its owner's contact summary.
#[derive(Serialize)]
pub struct ApplicationRow {
    #[serde(flatten)]
    pub application: LoanApplication,
    pub owner_name: String,
    pub owner_email: String,
}

/// List all applications with owner summaries, newest first.
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ApplicationRow>>> {
    let applications = application::list_applications(state.db.pool()).await?;

    let mut rows = Vec::with_capacity(applications.len());
    for app in applications {
        let owner = profile::get_profile(state.db.pool(), &app.user_id).await?;
        rows.push(ApplicationRow {
            owner_name: format!("{} {}", owner.first_name, owner.last_name),
            owner_email: owner.email,
            application: app,
        });
    }

    Ok(Json(rows))
}

/// An application with documents and activity feed.
#[derive(Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: LoanApplication,
    pub documents: Vec<LoanDocument>,
    pub activity: Vec<ActivityEntry>,
    pub completion_percent: u8,
}

/// Get one application with its documents and activity.
pub async fn detail(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetail>> {
    let app = application::get_application(state.db.pool(), &id).await?;
    let documents = document::list_for_loan(state.db.pool(), &id).await?;
    let activity = activity::list_for_loan(state.db.pool(), &id).await?;
    let (approved, total) = document::completion_counts(state.db.pool(), &id).await?;

    Ok(Json(ApplicationDetail {
        application: app,
        documents,
        activity,
        completion_percent: document::completion_percentage(approved, total),
    }))
}

/// Request to move an application to a new status.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: LoanStatus,
}

/// Response carrying the updated application.
#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    #[serde(flatten)]
    pub application: LoanApplication,
}

/// Apply a status transition. Illegal moves are rejected by the transition
/// table and leave the row untouched.
pub async fn update_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let application = application::update_status(state.db.pool(), &id, req.status).await?;

    info!(
        application = %id,
        status = %application.status,
        admin = %admin.user_id(),
        "Application status updated"
    );

    Ok(Json(UpdateStatusResponse {
        success: true,
        application,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{admin_auth, seed_client_with_application, test_state};
    use database::DatabaseError;

    #[tokio::test]
    async fn test_update_status_happy_and_illegal() {
        let state = test_state().await;
        let (_, app) = seed_client_with_application(&state).await;
        let admin = admin_auth(&state).await;

        let response = update_status(
            State(state.clone()),
            admin.clone(),
            Path(app.id.clone()),
            Json(UpdateStatusRequest {
                status: LoanStatus::DocumentReview,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.application.current_stage, 2);

        // funded from document_review is outside the table
        let result = update_status(
            State(state),
            admin,
            Path(app.id),
            Json(UpdateStatusRequest {
                status: LoanStatus::Funded,
            }),
        )
        .await;
        assert!(matches!(
            result,
            Err(crate::error::AdminError::Database(
                DatabaseError::Transition(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_list_includes_owner_summary() {
        let state = test_state().await;
        let (user_id, _) = seed_client_with_application(&state).await;
        let admin = admin_auth(&state).await;

        let rows = list(State(state), admin).await.unwrap();
        assert_eq!(rows.0.len(), 1);
        assert_eq!(rows.0[0].owner_email, format!("{user_id}@example.com"));
    }
}
