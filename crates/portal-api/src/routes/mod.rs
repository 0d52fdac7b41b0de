//! Route handlers for the portal API.

pub mod chat;
pub mod documents;
pub mod health;
pub mod leads;
pub mod portal;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Maximum accepted upload size.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Public lead-capture forms
        .route("/api/leads/quote", post(leads::quote))
        .route("/api/leads/eligibility", post(leads::eligibility))
        .route("/api/leads/schedule", post(leads::schedule))
        .route("/api/leads/contact", post(leads::contact))
        // Public live chat
        .route("/api/chat/send", post(chat::send))
        .route("/api/chat/webhook", post(chat::webhook))
        .route("/api/chat/:session_id/messages", get(chat::history))
        .route("/api/chat/:session_id/stream", get(chat::stream))
        // Authenticated document relay
        .route(
            "/api/documents/upload",
            post(documents::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/documents/:id/download", get(documents::download))
        // Authenticated client portal
        .route(
            "/api/portal/profile",
            get(portal::get_profile).put(portal::update_profile),
        )
        .route(
            "/api/portal/applications",
            get(portal::list_applications).post(portal::create_application),
        )
        .route("/api/portal/applications/:id", get(portal::get_application))
}
