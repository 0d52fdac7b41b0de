//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::status::{DocumentStatus, LoanStatus};

/// Profile for an authenticated user, one-to-one with the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Account UUID.
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Authorization role. Derived entirely from the `user_roles` row,
/// never from token contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bearer session for the authenticated endpoints.
///
/// Only the SHA-256 digest of the token is stored; the clear token is
/// returned once at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub created_at: String,
    pub expires_at: String,
}

/// A loan application owned by a portal user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LoanApplication {
    pub id: String,
    /// Unique generated reference, e.g. `HVC-2026-4F09A1`.
    pub reference_number: String,
    /// Owning account UUID.
    pub user_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    pub status: LoanStatus,
    /// Pipeline stage 1..=5, always written together with `status`.
    pub current_stage: i64,
    /// Human-readable description of the most recent change.
    pub last_action: String,
    pub last_action_date: String,
    pub created_at: String,
}

/// A document slot attached to a loan application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LoanDocument {
    pub id: String,
    /// Owning application.
    pub loan_id: String,
    pub document_name: String,
    pub document_type: String,
    pub status: DocumentStatus,
    /// Object storage key; set only after a successful upload.
    pub file_path: Option<String>,
    pub uploaded_at: Option<String>,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SenderType {
    User,
    Admin,
    System,
}

impl SenderType {
    pub fn as_str(self) -> &'static str {
        match self {
            SenderType::User => "user",
            SenderType::Admin => "admin",
            SenderType::System => "system",
        }
    }
}

/// A live-chat message within a visitor session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: String,
    /// Client-generated opaque session identifier.
    pub session_id: String,
    pub sender_type: SenderType,
    pub message: String,
    pub created_at: String,
}

/// An entry in an application's activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    pub id: i64,
    pub loan_id: String,
    pub message: String,
    pub created_at: String,
}
