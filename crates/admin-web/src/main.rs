//! Admin back-office API for the Harborview portal.
//!
//! Serves the JSON operations the back-office UI consumes: application
//! status transitions, document review, user and token management, and
//! aggregate stats. Binds to a private address; every route requires an
//! admin bearer token.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[cfg(test)]
pub(crate) mod tests {
    //! Shared fixtures for route tests.

    use crate::auth::AdminUser;
    use crate::state::AppState;
    use database::session::AuthenticatedUser;
    use database::{
        application, now_rfc3339, profile, role, Database, LoanApplication, NewApplication,
        Profile, Role,
    };

    pub(crate) async fn test_state() -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        AppState::new(db)
    }

    pub(crate) async fn seed_user(state: &AppState, user_id: &str, role_value: Role) {
        let now = now_rfc3339();
        profile::create_profile(
            state.db.pool(),
            &Profile {
                user_id: user_id.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("{user_id}@example.com"),
                phone: None,
                company_name: None,
                avatar_url: None,
                created_at: now.clone(),
                updated_at: now,
            },
        )
        .await
        .unwrap();
        role::set_role(state.db.pool(), user_id, role_value)
            .await
            .unwrap();
    }

    /// Seed a client with one freshly submitted application.
    pub(crate) async fn seed_client_with_application(
        state: &AppState,
    ) -> (String, LoanApplication) {
        let user_id = "client-1".to_string();
        seed_user(state, &user_id, Role::Client).await;
        let app = application::create_application(
            state.db.pool(),
            NewApplication {
                user_id: user_id.clone(),
                loan_type: "bridging".to_string(),
                loan_amount: 150_000.0,
            },
        )
        .await
        .unwrap();
        (user_id, app)
    }

    /// Seed an admin account and return its request identity.
    pub(crate) async fn admin_auth(state: &AppState) -> AdminUser {
        seed_user(state, "admin-1", Role::Admin).await;
        AdminUser(AuthenticatedUser {
            user_id: "admin-1".to_string(),
            role: Role::Admin,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting admin web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(db);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
