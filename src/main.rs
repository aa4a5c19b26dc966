// Módulos da aplicação
mod api;
mod app_state;
mod assistant;
mod chat;
mod config;
mod conversations;
mod database;
mod documents;
mod generation;
mod knowledge_base;
mod llm;
mod models;
mod profiles;
mod template_catalog;
mod templates;

use crate::app_state::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Carregar .env e inicializar o logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Carregar configuração
    let cfg = config::AppConfig::from_env()?;

    // 3. Conectar ao banco, garantir o esquema e os dados básicos
    let pool = database::connect_from_config(&cfg).await?;
    database::ensure_schema(&pool).await?;
    knowledge_base::seed_defaults(&pool).await?;
    template_catalog::ensure_builtin(&pool).await?;

    // 4. Inicializar o gestor do LLM
    let llm_manager = llm::LlmManager::from_config(&cfg);
    if !cfg.openai_api_key_present {
        warn!("OPENAI_API_KEY não configurada: a geração de documentos vai falhar e o chat usará respostas offline.");
    }

    // 5. Criar o estado compartilhado da aplicação
    let app_state = AppState {
        config: cfg.clone(),
        pool: pool.clone(),
        analyzer: Arc::new(llm_manager),
    };

    // 6. Configurar o router da API
    let app = Router::new()
        .merge(api::create_router(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // 7. Iniciar o servidor
    let server_addr = &app_state.config.server_addr;
    let listener = tokio::net::TcpListener::bind(server_addr).await?;
    info!("🚀 Servidor escutando em http://{}", server_addr);

    // Encerramento ordenado com Ctrl-C.
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Sinal de encerramento recebido, fechando o servidor.");
        })
        .await?;

    pool.close().await;
    info!("✅ Servidor encerrado corretamente.");
    Ok(())
}
