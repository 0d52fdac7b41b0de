//! Live chat routes.
//!
//! Visitor messages are persisted first, pushed to the session's live
//! stream, then relayed to the staffed channel. The relay leg is
//! best-effort: once a message is stored and visible, a bot API hiccup
//! should not bounce it back to the visitor.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use database::{chat, validation, ChatMessage, SenderType};
use futures::stream::Stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// A visitor chat message.
#[derive(Deserialize)]
pub struct SendRequest {
    pub session_id: String,
    pub message: String,
}

/// Response carrying the stored message.
#[derive(Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: ChatMessage,
}

/// Persist, push and relay a visitor message.
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<SendResponse>> {
    validation::validate_required("session_id", &req.session_id)?;
    validation::validate_required("message", &req.message)?;
    validation::validate_message("message", &req.message)?;

    let message = chat::insert_message(
        state.db.pool(),
        req.session_id.trim(),
        SenderType::User,
        req.message.trim(),
    )
    .await?;

    state.chat.publish(&message);

    // Best-effort relay; the message is already stored and visible.
    let block = notifier::chat_notification(&message.session_id, &message.message);
    if let Err(err) = state.notifier.send_text(&block).await {
        warn!(session = %message.session_id, error = %err, "Chat relay failed");
    }

    Ok(Json(SendResponse {
        success: true,
        message,
    }))
}

/// Message history for a session, oldest first.
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    let messages = chat::list_for_session(state.db.pool(), &session_id).await?;
    Ok(Json(messages))
}

/// SSE stream of new messages for a session.
pub async fn stream(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    info!(session = %session_id, "Chat stream opened");
    let receiver = state.chat.subscribe(&session_id);

    let stream = BroadcastStream::new(receiver).filter_map(|result| async move {
        match result {
            Ok(message) => Event::default()
                .event("message")
                .json_data(&message)
                .ok()
                .map(Ok),
            // A lagging subscriber loses its own events only.
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Inbound bot reply webhook payload.
#[derive(Deserialize)]
pub struct WebhookRequest {
    pub text: String,
}

/// Response for a routed reply.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub session_id: String,
}

/// Route a staffed reply back into its chat session.
///
/// The reply text must carry the `[session:<id>]` marker the outbound
/// notification included; anything else is rejected.
pub async fn webhook(
    State(state): State<AppState>,
    Json(req): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>> {
    let reply = notifier::parse_session_reply(&req.text).ok_or_else(|| {
        ApiError::BadRequest("reply does not carry a session marker".to_string())
    })?;

    let message = chat::insert_message(
        state.db.pool(),
        &reply.session_id,
        SenderType::Admin,
        &reply.message,
    )
    .await?;

    state.chat.publish(&message);
    info!(session = %reply.session_id, "Routed staffed reply to session");

    Ok(Json(WebhookResponse {
        success: true,
        session_id: reply.session_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChatHub;
    use database::Database;
    use notifier::{NotifyClient, NotifyConfig};
    use std::sync::Arc;
    use storage::FsStore;

    async fn test_state(dir: &std::path::Path) -> AppState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let notifier = NotifyClient::new(NotifyConfig::new(
            // Unroutable host; relay failures are tolerated by design.
            "http://127.0.0.1:9",
            "ops",
        ))
        .unwrap();
        AppState::new(db, Arc::new(FsStore::new(dir)), notifier, ChatHub::new())
    }

    #[tokio::test]
    async fn test_send_persists_and_pushes_despite_relay_failure() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let mut rx = state.chat.subscribe("sess-1");

        let response = send(
            State(state.clone()),
            Json(SendRequest {
                session_id: "sess-1".to_string(),
                message: "hello there".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(response.0.success);

        // Stored...
        let history = chat::list_for_session(state.db.pool(), "sess-1")
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender_type, SenderType::User);

        // ...and pushed.
        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.message, "hello there");
    }

    #[tokio::test]
    async fn test_webhook_routes_reply() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let mut rx = state.chat.subscribe("sess-7");

        let response = webhook(
            State(state.clone()),
            Json(WebhookRequest {
                text: "[session:sess-7] Yes, we can help with that.".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.session_id, "sess-7");

        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.sender_type, SenderType::Admin);
        assert_eq!(pushed.message, "Yes, we can help with that.");
    }

    #[tokio::test]
    async fn test_webhook_rejects_unmarked_reply() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let result = webhook(
            State(state),
            Json(WebhookRequest {
                text: "who is this for?".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
