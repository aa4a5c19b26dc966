//! Persistência dos documentos (DFD, ETP, TR) na tabela `documents`.

use anyhow::{bail, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::{types::Json, SqlitePool};
use uuid::Uuid;

use crate::models::{Document, DocumentStatus, DocumentType};

/// Dados para inserir um documento novo.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: String,
    pub conversation_id: Option<String>,
    pub title: String,
    pub doc_type: DocumentType,
    pub status: DocumentStatus,
    pub content: Value,
    pub generated_text: Option<String>,
}

pub async fn insert(pool: &SqlitePool, doc: NewDocument) -> Result<Document> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, Document>(
        "INSERT INTO documents
            (id, user_id, conversation_id, title, type, status, content, generated_text, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&doc.user_id)
    .bind(&doc.conversation_id)
    .bind(&doc.title)
    .bind(doc.doc_type)
    .bind(doc.status)
    .bind(Json(&doc.content))
    .bind(&doc.generated_text)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Document>> {
    let row = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Documentos do usuário, do mais recente para o mais antigo.
pub async fn list_by_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Document>> {
    let rows = sqlx::query_as::<_, Document>(
        "SELECT * FROM documents WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Troca o status; devolve `None` se o documento não existe.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: DocumentStatus,
) -> Result<Option<Document>> {
    let row = sqlx::query_as::<_, Document>(
        "UPDATE documents SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Título padrão: `"<SIGLA> - <objeto>"`, ou `"<SIGLA> - Novo Documento"`.
pub fn default_title(doc_type: DocumentType, fields: &Map<String, Value>) -> String {
    let objeto = fields
        .get("objeto")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Novo Documento");
    format!("{} - {}", doc_type.acronym(), objeto)
}

/// Chaves que não pertencem ao formulário do tipo informado.
pub fn unknown_fields(doc_type: DocumentType, fields: &Map<String, Value>) -> Vec<String> {
    let allowed = doc_type.fields();
    fields
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect()
}

/// Salva o rascunho digitado no formulário, sem texto gerado.
pub async fn save_draft(
    pool: &SqlitePool,
    user_id: &str,
    doc_type: DocumentType,
    fields: Map<String, Value>,
) -> Result<Document> {
    let unknown = unknown_fields(doc_type, &fields);
    if !unknown.is_empty() {
        bail!(
            "Campos não reconhecidos para {}: {}",
            doc_type.acronym(),
            unknown.join(", ")
        );
    }

    let title = default_title(doc_type, &fields);
    insert(
        pool,
        NewDocument {
            user_id: user_id.to_string(),
            conversation_id: None,
            title,
            doc_type,
            status: DocumentStatus::Draft,
            content: Value::Object(fields),
            generated_text: None,
        },
    )
    .await
}
