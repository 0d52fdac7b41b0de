//! Document review routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{document, DocumentStatus, LoanDocument};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AdminUser;
use crate::error::Result;
use crate::state::AppState;

/// Review outcome for a document in `processing`.
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub outcome: DocumentStatus,
}

/// Response carrying the reviewed document.
#[derive(Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    #[serde(flatten)]
    pub document: LoanDocument,
}

/// Approve a document or send it back for re-upload.
pub async fn review(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let document = document::review(state.db.pool(), &id, req.outcome).await?;

    info!(
        document = %id,
        outcome = %document.status,
        admin = %admin.user_id(),
        "Document reviewed"
    );

    Ok(Json(ReviewResponse {
        success: true,
        document,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{admin_auth, seed_client_with_application, test_state};
    use database::DatabaseError;

    #[tokio::test]
    async fn test_review_approves_processing_document() {
        let state = test_state().await;
        let (_, app) = seed_client_with_application(&state).await;
        let admin = admin_auth(&state).await;

        let docs = document::list_for_loan(state.db.pool(), &app.id).await.unwrap();
        document::mark_uploaded(state.db.pool(), &docs[0].id, "documents/k")
            .await
            .unwrap();

        let response = review(
            State(state),
            admin,
            Path(docs[0].id.clone()),
            Json(ReviewRequest {
                outcome: DocumentStatus::Approved,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.document.status, DocumentStatus::Approved);
    }

    #[tokio::test]
    async fn test_review_rejects_missing_document() {
        let state = test_state().await;
        let (_, app) = seed_client_with_application(&state).await;
        let admin = admin_auth(&state).await;

        let docs = document::list_for_loan(state.db.pool(), &app.id).await.unwrap();
        let result = review(
            State(state),
            admin,
            Path(docs[0].id.clone()),
            Json(ReviewRequest {
                outcome: DocumentStatus::Approved,
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
}
