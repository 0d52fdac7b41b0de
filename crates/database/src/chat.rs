//! Chat message persistence.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ChatMessage, SenderType};
use crate::now_rfc3339;

/// Persist a chat message within a session.
pub async fn insert_message(
    pool: &SqlitePool,
    session_id: &str,
    sender_type: SenderType,
    message: &str,
) -> Result<ChatMessage> {
    let msg = ChatMessage {
        id: Uuid::new_v4().to_string(),
        session_id: session_id.to_string(),
        sender_type,
        message: message.to_string(),
        created_at: now_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO chat_messages (id, session_id, sender_type, message, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&msg.id)
    .bind(&msg.session_id)
    .bind(msg.sender_type)
    .bind(&msg.message)
    .bind(&msg.created_at)
    .execute(pool)
    .await?;

    Ok(msg)
}

/// List messages for a session, oldest first.
pub async fn list_for_session(pool: &SqlitePool, session_id: &str) -> Result<Vec<ChatMessage>> {
    let messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, session_id, sender_type, message, created_at
        FROM chat_messages
        WHERE session_id = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[tokio::test]
    async fn test_messages_come_back_in_order() {
        let db = test_db().await;

        insert_message(db.pool(), "sess-1", SenderType::User, "hello")
            .await
            .unwrap();
        insert_message(db.pool(), "sess-1", SenderType::Admin, "hi, how can we help?")
            .await
            .unwrap();
        insert_message(db.pool(), "sess-2", SenderType::User, "other session")
            .await
            .unwrap();

        let messages = list_for_session(db.pool(), "sess-1").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "hello");
        assert_eq!(messages[0].sender_type, SenderType::User);
        assert_eq!(messages[1].sender_type, SenderType::Admin);
    }
}
