//! Fluxo de uma mensagem do chat: grava a pergunta, tenta gerar um
//! documento e grava a resposta do assistente.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    app_state::AppState,
    assistant,
    conversations,
    generation::{self, GenerationOutcome},
    models::{ChatMessage, DocumentType, MessageRole},
};

/// Resposta do assistente para uma mensagem enviada.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    /// `true` quando a geração falhou e a resposta é a mensagem de erro padrão.
    pub failed: bool,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("A mensagem não pode ser vazia")]
    EmptyMessage,
    /// Conversa inexistente ou de outro usuário.
    #[error("Conversa não encontrada")]
    ConversationNotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub async fn send_message(
    state: &AppState,
    conversation_id: &str,
    user_id: &str,
    content: &str,
) -> Result<ChatReply, ChatError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    if conversations::find_for_user(&state.pool, conversation_id, user_id)
        .await?
        .is_none()
    {
        return Err(ChatError::ConversationNotFound);
    }

    let user_message = conversations::insert_message(
        &state.pool,
        conversation_id,
        user_id,
        MessageRole::User,
        content,
    )
    .await?;
    conversations::set_title_from_first_message(&state.pool, conversation_id, content).await?;

    let (reply_text, document_id, document_type, failed) = if state.analyzer.is_available() {
        match generation::generate_document(
            state.analyzer.as_ref(),
            &state.pool,
            content,
            user_id,
            Some(conversation_id),
        )
        .await
        {
            Ok(GenerationOutcome::Generated(doc)) => {
                (doc.response, Some(doc.document_id), Some(doc.document_type), false)
            }
            Ok(GenerationOutcome::Guidance(guidance)) => (guidance.response, None, None, false),
            Err(e) => {
                error!("Erro ao gerar documento na conversa {conversation_id}: {e}");
                (assistant::APOLOGY_MESSAGE.to_string(), None, None, true)
            }
        }
    } else {
        warn!("Modelo indisponível; respondendo com orientação offline.");
        (assistant::guidance_reply(content), None, None, false)
    };

    let assistant_message = conversations::insert_message(
        &state.pool,
        conversation_id,
        user_id,
        MessageRole::Assistant,
        &reply_text,
    )
    .await?;

    Ok(ChatReply {
        user_message,
        assistant_message,
        document_id,
        document_type,
        failed,
    })
}
