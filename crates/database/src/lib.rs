//! SQLite persistence layer for the Harborview portal.
//!
//! This crate provides async database operations for profiles, roles, loan
//! applications, loan documents, chat messages and activity entries using
//! SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{application, Database, NewApplication};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:portal.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let app = application::create_application(
//!         db.pool(),
//!         NewApplication {
//!             user_id: "c27fb365-0c84-4cf2-8555-814bb065e448".to_string(),
//!             loan_type: "bridging".to_string(),
//!             loan_amount: 250_000.0,
//!         },
//!     )
//!     .await?;
//!     println!("created {}", app.reference_number);
//!
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod application;
pub mod chat;
pub mod document;
pub mod error;
pub mod models;
pub mod profile;
pub mod role;
pub mod session;
pub mod status;
pub mod validation;

pub use application::NewApplication;
pub use error::{DatabaseError, Result};
pub use models::{
    ActivityEntry, ChatMessage, LoanApplication, LoanDocument, Profile, Role,
    SenderType, Session,
};
pub use status::{DocumentStatus, LoanStatus, TransitionError};
pub use validation::ValidationError;

use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Current UTC time as RFC 3339 text, the format used for every timestamp
/// column. Microsecond precision so text ordering matches insertion order.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent request handling.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for an in-memory database in tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[tokio::test]
    async fn test_profile_crud() {
        let db = test_db().await;

        let profile = Profile {
            user_id: "test-uuid-123".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Bryant".to_string(),
            email: "alice@example.com".to_string(),
            phone: Some("+44 7700 900123".to_string()),
            company_name: None,
            avatar_url: None,
            created_at: now_rfc3339(),
            updated_at: now_rfc3339(),
        };
        profile::create_profile(db.pool(), &profile).await.unwrap();
        role::set_role(db.pool(), &profile.user_id, Role::Client)
            .await
            .unwrap();

        let fetched = profile::get_profile(db.pool(), &profile.user_id)
            .await
            .unwrap();
        assert_eq!(fetched.first_name, "Alice");
        assert_eq!(
            role::get_role(db.pool(), &profile.user_id).await.unwrap(),
            Role::Client
        );

        let listed = profile::list_profiles_with_roles(db.pool()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "alice@example.com");
    }
}
