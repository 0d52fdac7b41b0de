//! Public and client-facing API server for the Harborview portal.
//!
//! Serves the lead-capture endpoints, live chat, and the authenticated
//! client dashboard (applications, documents, profile).

mod auth;
mod config;
mod error;
mod events;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use notifier::{NotifyClient, NotifyConfig};
use storage::{FailoverStore, FsStore, HttpStore, ObjectStore};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::events::ChatHub;
use crate::state::AppState;

/// Assemble the document store from configuration.
///
/// With a gateway configured the store is gateway-primary with the local
/// spool as fallback; without one, the spool serves alone.
fn build_store(config: &Config) -> Result<Arc<dyn ObjectStore>, storage::StorageError> {
    let spool = FsStore::new(&config.storage_fallback_dir);

    match config.storage_gateway.clone() {
        Some(gateway) => {
            let primary = HttpStore::new(gateway)?;
            info!(
                fallback = %config.storage_fallback_dir,
                "Document store: gateway with local fallback"
            );
            Ok(Arc::new(FailoverStore::new(
                Box::new(primary),
                Box::new(spool),
            )))
        }
        None => {
            info!(
                root = %config.storage_fallback_dir,
                "Document store: local directory only"
            );
            Ok(Arc::new(spool))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting portal API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Document store and relay client
    let store = build_store(&config)?;
    let notifier = NotifyClient::new(NotifyConfig::new(
        config.bot_api_url.as_str(),
        config.bot_channel.as_str(),
    ))?;

    // Build application state
    let state = AppState::new(db, store, notifier, ChatHub::new());

    // Build router. The lead-capture and chat endpoints are called from the
    // public website, so CORS is wide open.
    let app = routes::router()
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Portal API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
