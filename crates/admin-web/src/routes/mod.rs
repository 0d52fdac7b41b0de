//! Route handlers for the admin web interface.

pub mod applications;
pub mod documents;
pub mod health;
pub mod stats;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Applications
        .route("/api/applications", get(applications::list))
        .route("/api/applications/:id", get(applications::detail))
        .route("/api/applications/:id/status", put(applications::update_status))
        // Document review
        .route("/api/documents/:id/review", put(documents::review))
        // Users, roles and tokens
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:user_id/role", put(users::set_role))
        .route("/api/sessions", post(users::issue_session))
        .route("/api/sessions/:id", axum::routing::delete(users::revoke_session))
        // Stats
        .route("/api/stats", get(stats::stats))
}
