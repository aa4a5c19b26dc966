//! Catálogo de modelos registrados na tabela `templates`.

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use sqlx::{types::Json, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::models::{DocumentType, TemplateRecord};

pub async fn list_active(pool: &SqlitePool) -> Result<Vec<TemplateRecord>> {
    let rows = sqlx::query_as::<_, TemplateRecord>(
        "SELECT * FROM templates WHERE is_active = 1 ORDER BY type ASC, name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Registra os três modelos embutidos, uma única vez.
pub async fn ensure_builtin(pool: &SqlitePool) -> Result<()> {
    let mut created = 0;
    for doc_type in DocumentType::ALL {
        let data = json!({
            "markdown": doc_type.template(),
            "fields": doc_type.fields(),
        });
        let result = sqlx::query(
            "INSERT INTO templates (id, name, type, description, template_data, is_active, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, 1, NULL, ?)
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(doc_type.display_name())
        .bind(doc_type)
        .bind(format!("Modelo padrão de {}", doc_type.acronym()))
        .bind(Json(data))
        .bind(Utc::now())
        .execute(pool)
        .await?;
        created += result.rows_affected();
    }

    if created > 0 {
        info!("{created} modelos padrão registrados.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;

    #[tokio::test]
    async fn builtin_templates_are_registered_once() {
        let pool = database::connect_in_memory().await.unwrap();
        database::ensure_schema(&pool).await.unwrap();
        ensure_builtin(&pool).await.unwrap();
        ensure_builtin(&pool).await.unwrap();

        let templates = list_active(&pool).await.unwrap();
        let types: Vec<DocumentType> = templates.iter().map(|t| t.doc_type).collect();
        assert_eq!(types, [DocumentType::Dfd, DocumentType::Etp, DocumentType::Tr]);

        let tr = &templates[2];
        assert_eq!(tr.name, "TR - Termo de Referência");
        assert!(tr.is_active);
        assert_eq!(tr.template_data.0["fields"][0], "objeto");
    }
}
