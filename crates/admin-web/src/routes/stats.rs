//! Back-office statistics.

use axum::extract::State;
use axum::Json;
use database::{activity, application, document, profile, ActivityEntry};
use database::{DocumentStatus, LoanStatus};
use serde::Serialize;

use crate::auth::AdminUser;
use crate::error::Result;
use crate::state::AppState;

/// Back-office dashboard statistics.
#[derive(Serialize)]
pub struct Stats {
    pub user_count: i64,
    pub application_count: i64,
    pub applications_by_status: Vec<StatusCount<LoanStatus>>,
    pub documents_by_status: Vec<StatusCount<DocumentStatus>>,
    pub recent_activity: Vec<ActivityEntry>,
}

/// A status bucket with its count.
#[derive(Serialize)]
pub struct StatusCount<S> {
    pub status: S,
    pub count: i64,
}

/// Number of activity entries included in the stats payload.
const RECENT_ACTIVITY_LIMIT: i64 = 20;

/// Aggregate statistics for the back-office dashboard.
pub async fn stats(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Stats>> {
    let pool = state.db.pool();

    let user_count = profile::count_profiles(pool).await?;
    let application_count = application::count_applications(pool).await?;
    let applications_by_status = application::count_by_status(pool)
        .await?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    let documents_by_status = document::count_by_status(pool)
        .await?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    let recent_activity = activity::recent(pool, RECENT_ACTIVITY_LIMIT).await?;

    Ok(Json(Stats {
        user_count,
        application_count,
        applications_by_status,
        documents_by_status,
        recent_activity,
    }))
}
