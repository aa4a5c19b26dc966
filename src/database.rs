use crate::config::AppConfig;
use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

pub async fn connect_from_config(cfg: &AppConfig) -> Result<SqlitePool> {
    info!("Conectando ao banco em {}...", redact_url(&cfg.database_url));
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.database_max_connections.max(1))
        .connect(&cfg.database_url)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    info!("Conexão com o banco OK");
    Ok(pool)
}

/// Pool em memória com uma única conexão, para que todas as consultas
/// enxerguem o mesmo banco.
#[cfg(test)]
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    Ok(pool)
}

/// Cria as tabelas usadas pela aplicação:
/// conversations, messages, documents, law_articles, profiles e templates.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS conversations (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            title       TEXT NOT NULL DEFAULT 'Nova Conversa',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS messages (
            id              TEXT PRIMARY KEY,
            conversation_id TEXT NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
            user_id         TEXT NOT NULL,
            role            TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
            content         TEXT NOT NULL,
            created_at      TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS documents (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            conversation_id TEXT REFERENCES conversations(id) ON DELETE SET NULL,
            title           TEXT NOT NULL,
            type            TEXT NOT NULL CHECK (type IN ('dfd', 'etp', 'tr')),
            status          TEXT NOT NULL DEFAULT 'draft'
                            CHECK (status IN ('draft', 'completed', 'archived')),
            content         TEXT NOT NULL,
            generated_text  TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS law_articles (
            id              TEXT PRIMARY KEY,
            article_number  TEXT NOT NULL,
            title           TEXT,
            content         TEXT NOT NULL,
            section         TEXT,
            chapter         TEXT,
            keywords        TEXT NOT NULL DEFAULT '[]',
            created_at      TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS profiles (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL,
            full_name   TEXT,
            orgao       TEXT,
            cargo       TEXT,
            role        TEXT NOT NULL DEFAULT 'servidor_publico'
                        CHECK (role IN ('admin', 'servidor_publico', 'gestor')),
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS templates (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL UNIQUE,
            type            TEXT NOT NULL CHECK (type IN ('dfd', 'etp', 'tr')),
            description     TEXT,
            template_data   TEXT NOT NULL,
            is_active       INTEGER NOT NULL DEFAULT 1,
            created_by      TEXT,
            created_at      TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_conversations_user ON conversations(user_id, updated_at)",
    ];

    for stmt in statements {
        sqlx::query(stmt).execute(pool).await?;
    }

    info!("Esquema do banco garantido (tabelas e índices criados).");
    Ok(())
}

/// Esconde credenciais embutidas na URL antes de registrar em log.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
