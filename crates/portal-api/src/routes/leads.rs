//! Public lead-capture routes.
//!
//! Each form validates its required fields, formats a fixed text block and
//! relays it to the staffed channel. Nothing is persisted; the relay is the
//! whole point of these endpoints.

use axum::extract::State;
use axum::Json;
use database::validation;
use notifier::{ContactMessage, EligibilityCheck, QuoteRequest, ScheduleRequest};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Success envelope returned by the public endpoints.
#[derive(Serialize)]
pub struct Accepted {
    pub success: bool,
}

fn accepted() -> Json<Accepted> {
    Json(Accepted { success: true })
}

/// Handle a quote request.
pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<Accepted>> {
    validation::validate_required("name", &req.name)?;
    validation::validate_email(&req.email)?;
    validation::validate_required("phone", &req.phone)?;
    validation::validate_required("loan_type", &req.loan_type)?;
    validation::validate_loan_amount(req.loan_amount)?;
    if let Some(message) = &req.message {
        validation::validate_message("message", message)?;
    }

    state.notifier.send_text(&req.format()).await?;
    info!(loan_type = %req.loan_type, "Quote request relayed");
    Ok(accepted())
}

/// Handle an eligibility check.
pub async fn eligibility(
    State(state): State<AppState>,
    Json(req): Json<EligibilityCheck>,
) -> Result<Json<Accepted>> {
    validation::validate_required("name", &req.name)?;
    validation::validate_email(&req.email)?;
    validation::validate_required("phone", &req.phone)?;
    validation::validate_required("employment_status", &req.employment_status)?;
    validation::validate_loan_amount(req.annual_income)?;
    validation::validate_loan_amount(req.loan_amount)?;

    state.notifier.send_text(&req.format()).await?;
    info!("Eligibility check relayed");
    Ok(accepted())
}

/// Handle an appointment scheduling request.
pub async fn schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Accepted>> {
    validation::validate_required("name", &req.name)?;
    validation::validate_email(&req.email)?;
    validation::validate_required("phone", &req.phone)?;
    validation::validate_required("preferred_date", &req.preferred_date)?;
    validation::validate_required("preferred_time", &req.preferred_time)?;

    state.notifier.send_text(&req.format()).await?;
    info!(date = %req.preferred_date, "Appointment request relayed");
    Ok(accepted())
}

/// Handle a contact form submission.
pub async fn contact(
    State(state): State<AppState>,
    Json(req): Json<ContactMessage>,
) -> Result<Json<Accepted>> {
    validation::validate_required("name", &req.name)?;
    validation::validate_email(&req.email)?;
    validation::validate_required("message", &req.message)?;
    validation::validate_message("message", &req.message)?;

    state.notifier.send_text(&req.format()).await?;
    info!("Contact message relayed");
    Ok(accepted())
}
