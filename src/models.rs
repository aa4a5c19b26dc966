//! Modelos de domínio (linhas das tabelas e enums compartilhados).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Os três documentos de planejamento previstos na Lei 14.133/2021.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize, EnumString, Display)]
#[sqlx(type_name = "document_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentType {
    Dfd,
    Etp,
    Tr,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [DocumentType::Dfd, DocumentType::Etp, DocumentType::Tr];

    /// Aceita `dfd|etp|tr` sem diferenciar maiúsculas e ignorando espaços.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(&raw.trim().to_lowercase()).ok()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Dfd => "DFD - Documento de Formalização de Demanda",
            DocumentType::Etp => "ETP - Estudo Técnico Preliminar",
            DocumentType::Tr => "TR - Termo de Referência",
        }
    }

    /// Sigla em maiúsculas, usada nos títulos padrão.
    pub fn acronym(&self) -> &'static str {
        match self {
            DocumentType::Dfd => "DFD",
            DocumentType::Etp => "ETP",
            DocumentType::Tr => "TR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, EnumString, Display, Default)]
#[sqlx(type_name = "document_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Completed,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, EnumString, Display)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, EnumString, Display, Default)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    ServidorPublico,
    Gestor,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrador",
            UserRole::ServidorPublico => "Servidor Público",
            UserRole::Gestor => "Gestor",
        }
    }
}

/// Linha da tabela `documents`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: String,
    pub conversation_id: Option<String>,
    pub title: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub status: DocumentStatus,
    /// Campos estruturados (extraídos pelo LLM ou digitados no formulário).
    pub content: Json<serde_json::Value>,
    pub generated_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha da tabela `conversations`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha da tabela `messages`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Artigo da Lei 14.133/2021 na base de conhecimento.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawArticle {
    pub id: String,
    pub article_number: String,
    pub title: Option<String>,
    pub content: String,
    pub section: Option<String>,
    pub chapter: Option<String>,
    pub keywords: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Perfil do usuário; `id` é o id do provedor de autenticação.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub orgao: Option<String>,
    pub cargo: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha da tabela `templates`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub description: Option<String>,
    pub template_data: Json<serde_json::Value>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
