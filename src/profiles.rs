//! Perfis de usuário (nome, órgão, cargo e papel).

use anyhow::Result;
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Profile, UserRole};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: Option<String>,
    pub orgao: Option<String>,
    pub cargo: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

pub async fn find(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Cria ou atualiza o perfil; `created_at` é preservado em atualizações.
pub async fn upsert(pool: &SqlitePool, user_id: &str, update: &ProfileUpdate) -> Result<Profile> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (id, email, full_name, orgao, cargo, role, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            email = excluded.email,
            full_name = excluded.full_name,
            orgao = excluded.orgao,
            cargo = excluded.cargo,
            role = excluded.role,
            updated_at = excluded.updated_at
         RETURNING *",
    )
    .bind(user_id)
    .bind(update.email.trim())
    .bind(&update.full_name)
    .bind(&update.orgao)
    .bind(&update.cargo)
    .bind(update.role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    info!("Perfil {} salvo ({})", row.id, row.role.label());
    Ok(row)
}
