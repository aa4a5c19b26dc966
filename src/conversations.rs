//! Conversas do chat e suas mensagens.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    assistant,
    models::{ChatMessage, Conversation, MessageRole},
};

pub const DEFAULT_TITLE: &str = "Nova Conversa";
const TITLE_MAX_CHARS: usize = 50;

pub async fn create(pool: &SqlitePool, user_id: &str) -> Result<Conversation> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, Conversation>(
        "INSERT INTO conversations (id, user_id, title, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(DEFAULT_TITLE)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Conversas do usuário, da atualizada mais recentemente para a mais antiga.
pub async fn list_by_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Conversation>> {
    let rows = sqlx::query_as::<_, Conversation>(
        "SELECT * FROM conversations WHERE user_id = ? ORDER BY updated_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Busca a conversa apenas se ela pertence ao usuário.
pub async fn find_for_user(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> Result<Option<Conversation>> {
    let row = sqlx::query_as::<_, Conversation>(
        "SELECT * FROM conversations WHERE id = ? AND user_id = ?",
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_message(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
    role: MessageRole,
    content: &str,
) -> Result<ChatMessage> {
    let row = sqlx::query_as::<_, ChatMessage>(
        "INSERT INTO messages (id, conversation_id, user_id, role, content, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(conversation_id)
    .bind(user_id)
    .bind(role)
    .bind(content)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(row.created_at)
        .bind(conversation_id)
        .execute(pool)
        .await?;

    Ok(row)
}

/// Histórico da conversa em ordem cronológica.
pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: &str,
    user_id: &str,
) -> Result<Vec<ChatMessage>> {
    let rows = sqlx::query_as::<_, ChatMessage>(
        "SELECT * FROM messages
         WHERE conversation_id = ? AND user_id = ?
         ORDER BY created_at ASC, rowid ASC",
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Mensagem de boas-vindas exibida em conversas sem histórico; não é gravada.
pub fn welcome_message(conversation_id: &str, user_id: &str) -> ChatMessage {
    ChatMessage {
        id: "welcome".to_string(),
        conversation_id: conversation_id.to_string(),
        user_id: user_id.to_string(),
        role: MessageRole::Assistant,
        content: assistant::WELCOME_MESSAGE.to_string(),
        created_at: Utc::now(),
    }
}

/// Título derivado da primeira mensagem do usuário.
pub fn title_from_message(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}

/// Renomeia a conversa a partir da mensagem, mas só enquanto ela ainda
/// tem o título padrão. Devolve `true` quando o título mudou.
pub async fn set_title_from_first_message(
    pool: &SqlitePool,
    conversation_id: &str,
    content: &str,
) -> Result<bool> {
    let title = title_from_message(content);
    if title.is_empty() {
        return Ok(false);
    }
    let result = sqlx::query(
        "UPDATE conversations SET title = ?, updated_at = ? WHERE id = ? AND title = ?",
    )
    .bind(&title)
    .bind(Utc::now())
    .bind(conversation_id)
    .bind(DEFAULT_TITLE)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
