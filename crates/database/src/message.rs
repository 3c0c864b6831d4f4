//! Chat message storage.

use sqlx::{PgExecutor, PgPool};

use crate::error::Result;
use crate::models::{Conversation, Message, NewMessage};

/// Default page size for the conversation view.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

async fn insert_with<'e, E>(executor: E, message: &NewMessage) -> Result<Message>
where
    E: PgExecutor<'e>,
{
    let stored = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (page_id, sender_id, role, message_text, platform, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, page_id, sender_id, role, message_text, platform, created_at
        "#,
    )
    .bind(&message.page_id)
    .bind(&message.sender_id)
    .bind(message.role.as_str())
    .bind(&message.message_text)
    .bind(message.platform.as_str())
    .bind(message.created_at)
    .fetch_one(executor)
    .await?;

    Ok(stored)
}

/// Store one message.
pub async fn insert_message(pool: &PgPool, message: &NewMessage) -> Result<Message> {
    insert_with(pool, message).await
}

/// Store a user message and the reply to it atomically.
pub async fn insert_exchange(
    pool: &PgPool,
    user: &NewMessage,
    assistant: &NewMessage,
) -> Result<(Message, Message)> {
    let mut tx = pool.begin().await?;
    let user = insert_with(&mut *tx, user).await?;
    let assistant = insert_with(&mut *tx, assistant).await?;
    tx.commit().await?;

    tracing::debug!(sender_id = %user.sender_id, "Stored message exchange");
    Ok((user, assistant))
}

/// The most recent `limit` messages for a sender, oldest first.
pub async fn recent_messages(pool: &PgPool, sender_id: &str, limit: i64) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, page_id, sender_id, role, message_text, platform, created_at
        FROM (
            SELECT id, page_id, sender_id, role, message_text, platform, created_at
            FROM messages
            WHERE sender_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
        ) AS recent
        ORDER BY created_at ASC
        "#,
    )
    .bind(sender_id)
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Latest message of every conversation, most recently active first.
pub async fn latest_per_sender(pool: &PgPool) -> Result<Vec<Conversation>> {
    let conversations = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT sender_id, last_message, last_role, last_timestamp
        FROM (
            SELECT DISTINCT ON (sender_id)
                sender_id,
                message_text AS last_message,
                role AS last_role,
                created_at AS last_timestamp
            FROM messages
            ORDER BY sender_id, created_at DESC
        ) AS latest
        ORDER BY last_timestamp DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(conversations)
}
