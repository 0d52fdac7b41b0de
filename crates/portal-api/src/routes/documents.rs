//! Authenticated document upload and download.

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use database::{application, document, LoanDocument};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Response carrying the updated document row.
#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub document: LoanDocument,
}

/// Store an uploaded file and record it against the matching document slot.
///
/// Ownership is checked before any byte moves. The blob write goes through
/// the failover store; only when it succeeds is the row transitioned to
/// `processing` with the new key. If storage fails entirely the row is left
/// untouched, so a failed upload can simply be retried.
pub(crate) async fn store_upload(
    state: &AppState,
    auth: &AuthUser,
    loan_id: &str,
    document_type: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<LoanDocument> {
    let app = application::get_application(state.db.pool(), loan_id).await?;
    if app.user_id != auth.user_id() && !auth.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let doc = document::find_by_type(state.db.pool(), loan_id, document_type).await?;
    // Reject uploads the row state cannot accept before paying for the
    // blob write.
    doc.status
        .validate_transition(database::DocumentStatus::Processing)
        .map_err(database::DatabaseError::from)?;

    let key = storage::document_key(
        loan_id,
        document_type,
        filename,
        chrono::Utc::now().timestamp_millis(),
    );

    state.store.put(&key, bytes, content_type).await?;

    let updated = document::mark_uploaded(state.db.pool(), &doc.id, &key).await?;
    info!(
        loan = %loan_id,
        document = %updated.id,
        key = %key,
        "Document uploaded"
    );

    Ok(updated)
}

/// Handle a multipart document upload.
///
/// Expects `loan_id` and `document_type` fields ahead of a `file` field.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut loan_id = None;
    let mut document_type = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("loan_id") => {
                loan_id = Some(field.text().await.map_err(bad_field)?);
            }
            Some("document_type") => {
                document_type = Some(field.text().await.map_err(bad_field)?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_field)?.to_vec();
                file = Some((filename, content_type, bytes));
            }
            _ => {}
        }
    }

    let loan_id = loan_id.ok_or_else(|| missing("loan_id"))?;
    let document_type = document_type.ok_or_else(|| missing("document_type"))?;
    let (filename, content_type, bytes) = file.ok_or_else(|| missing("file"))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }

    let document = store_upload(
        &state,
        &auth,
        &loan_id,
        &document_type,
        &filename,
        &content_type,
        &bytes,
    )
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        document,
    }))
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("unreadable multipart field: {e}"))
}

fn missing(field: &str) -> ApiError {
    ApiError::BadRequest(format!("missing field: {field}"))
}

/// Stream a stored document back to its owner (or an admin).
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let doc = document::get_document_with_owner(state.db.pool(), &id).await?;
    if doc.owner_id != auth.user_id() && !auth.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let key = doc
        .file_path
        .ok_or_else(|| ApiError::BadRequest("document has no uploaded file".to_string()))?;

    let object = state.store.get(&key).await?;

    let filename = key.rsplit('/').next().unwrap_or("document");
    let headers = [
        (CONTENT_TYPE, object.content_type.clone()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    info!(document = %id, key = %key, "Document downloaded");
    Ok((headers, object.bytes))
}
