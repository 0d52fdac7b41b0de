//! Authenticated client portal routes.

use axum::extract::{Path, State};
use axum::Json;
use database::profile::ProfileUpdate;
use database::{
    activity, application, document, profile, ActivityEntry, LoanApplication, LoanDocument,
    NewApplication, Profile,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Get the caller's profile.
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Profile>> {
    let profile = profile::get_profile(state.db.pool(), auth.user_id()).await?;
    Ok(Json(profile))
}

/// Profile fields a client may update.
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Update the caller's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let updated = profile::update_profile(
        state.db.pool(),
        auth.user_id(),
        &ProfileUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            company_name: req.company_name,
            avatar_url: req.avatar_url,
        },
    )
    .await?;

    Ok(Json(updated))
}

/// An application with its document progress figures.
#[derive(Serialize)]
pub struct ApplicationSummary {
    #[serde(flatten)]
    pub application: LoanApplication,
    pub documents_approved: i64,
    pub documents_total: i64,
    pub completion_percent: u8,
}

async fn summarize(state: &AppState, application: LoanApplication) -> Result<ApplicationSummary> {
    let (approved, total) = document::completion_counts(state.db.pool(), &application.id).await?;
    Ok(ApplicationSummary {
        application,
        documents_approved: approved,
        documents_total: total,
        completion_percent: document::completion_percentage(approved, total),
    })
}

/// List the caller's applications, newest first.
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ApplicationSummary>>> {
    let applications =
        application::list_applications_for_user(state.db.pool(), auth.user_id()).await?;

    let mut summaries = Vec::with_capacity(applications.len());
    for app in applications {
        summaries.push(summarize(&state, app).await?);
    }

    Ok(Json(summaries))
}

/// Request to open a new application.
#[derive(Deserialize)]
pub struct CreateApplicationRequest {
    pub loan_type: String,
    pub loan_amount: f64,
}

/// Create an application for the caller.
pub async fn create_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<Json<ApplicationSummary>> {
    let app = application::create_application(
        state.db.pool(),
        NewApplication {
            user_id: auth.user_id().to_string(),
            loan_type: req.loan_type,
            loan_amount: req.loan_amount,
        },
    )
    .await?;

    info!(reference = %app.reference_number, user = %auth.user_id(), "Application created");
    Ok(Json(summarize(&state, app).await?))
}

/// An application with its documents and activity feed.
#[derive(Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    pub documents: Vec<LoanDocument>,
    pub activity: Vec<ActivityEntry>,
}

/// Get one of the caller's applications with documents and activity.
pub async fn get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetail>> {
    let app = application::get_application(state.db.pool(), &id).await?;
    if app.user_id != auth.user_id() && !auth.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let documents = document::list_for_loan(state.db.pool(), &id).await?;
    let activity = activity::list_for_loan(state.db.pool(), &id).await?;

    Ok(Json(ApplicationDetail {
        summary: summarize(&state, app).await?,
        documents,
        activity,
    }))
}
