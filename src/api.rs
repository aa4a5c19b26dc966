use std::str::FromStr;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::{
    app_state::AppState,
    chat::{self, ChatError, ChatReply},
    conversations, documents,
    generation::{self, GenerationOutcome},
    knowledge_base,
    models::{
        ChatMessage, Conversation, Document, DocumentStatus, DocumentType, LawArticle, Profile,
        TemplateRecord,
    },
    profiles::{self, ProfileUpdate},
    template_catalog,
};

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn internal_error(context: &str, err: impl std::fmt::Display) -> ApiError {
    error!("{context}: {err}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {err}"))
}

/// Rejeições do extrator `Json` também respondem com `{"error": ...}`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| api_error(rejection.status(), rejection.body_text()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| api_error(rejection.status(), rejection.body_text()))
}

// --- Payloads da API ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentPayload {
    message: String,
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationPayload {
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    user_id: String,
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftPayload {
    user_id: String,
    #[serde(rename = "type")]
    doc_type: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct StatusPayload {
    status: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/generate-document", post(generate_document_handler))
        .route("/api/health", get(health_handler))
        .route(
            "/api/conversations",
            get(list_conversations_handler).post(create_conversation_handler),
        )
        .route(
            "/api/conversations/:id/messages",
            get(list_messages_handler).post(send_message_handler),
        )
        .route(
            "/api/documents",
            get(list_documents_handler).post(save_draft_handler),
        )
        .route("/api/documents/:id", get(get_document_handler))
        .route("/api/documents/:id/status", patch(update_status_handler))
        .route("/api/documents/:id/download", get(download_document_handler))
        .route("/api/law-articles", get(search_law_articles_handler))
        .route(
            "/api/profiles/:user_id",
            get(get_profile_handler).put(upsert_profile_handler),
        )
        .route("/api/templates", get(list_templates_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn generate_document_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDocumentPayload>, JsonRejection>,
) -> Result<Json<GenerationOutcome>, ApiError> {
    let payload = json_body(payload)?;
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "A mensagem não pode ser vazia."));
    }

    let result = generation::generate_document(
        state.analyzer.as_ref(),
        &state.pool,
        &payload.message,
        &payload.user_id,
        None,
    )
    .await;

    match result {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) if e.raw_content().is_some() => {
            error!("Erro ao interpretar o conteúdo do modelo: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string(), "rawContent": e.raw_content() })),
            ))
        }
        Err(e) => {
            error!("Erro na geração do documento: {e}");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro ao gerar documento: {e}"),
            ))
        }
    }
}

#[axum::debug_handler]
async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| internal_error("Erro no health check do banco", e))?;

    Ok(Json(json!({
        "status": "ok",
        "llmAvailable": state.analyzer.is_available(),
        "model": state.config.llm_chat_model,
    })))
}

#[axum::debug_handler]
async fn list_conversations_handler(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    let query = query_params(query)?;
    conversations::list_by_user(&state.pool, &query.user_id)
        .await
        .map(Json)
        .map_err(|e| internal_error("Erro ao listar conversas", e))
}

#[axum::debug_handler]
async fn create_conversation_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateConversationPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let conversation = conversations::create(&state.pool, &payload.user_id)
        .await
        .map_err(|e| internal_error("Não foi possível criar uma nova conversa", e))?;
    let welcome = conversations::welcome_message(&conversation.id, &payload.user_id);

    info!("Conversa {} criada para o usuário {}", conversation.id, payload.user_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "conversation": conversation, "messages": [welcome] })),
    ))
}

#[axum::debug_handler]
async fn list_messages_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let query = query_params(query)?;
    let found = conversations::find_for_user(&state.pool, &conversation_id, &query.user_id)
        .await
        .map_err(|e| internal_error("Não foi possível carregar a conversa", e))?;
    if found.is_none() {
        return Err(api_error(StatusCode::NOT_FOUND, "Conversa não encontrada."));
    }

    let messages = conversations::list_messages(&state.pool, &conversation_id, &query.user_id)
        .await
        .map_err(|e| internal_error("Não foi possível carregar a conversa", e))?;

    if messages.is_empty() {
        return Ok(Json(vec![conversations::welcome_message(
            &conversation_id,
            &query.user_id,
        )]));
    }
    Ok(Json(messages))
}

#[axum::debug_handler]
async fn send_message_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    payload: Result<Json<SendMessagePayload>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let payload = json_body(payload)?;
    chat::send_message(&state, &conversation_id, &payload.user_id, &payload.content)
        .await
        .map(Json)
        .map_err(|e| match e {
            ChatError::EmptyMessage => api_error(StatusCode::BAD_REQUEST, e.to_string()),
            ChatError::ConversationNotFound => api_error(StatusCode::NOT_FOUND, e.to_string()),
            ChatError::Storage(err) => internal_error("Erro ao salvar mensagem", err),
        })
}

#[axum::debug_handler]
async fn list_documents_handler(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let query = query_params(query)?;
    documents::list_by_user(&state.pool, &query.user_id)
        .await
        .map(Json)
        .map_err(|e| internal_error("Erro ao listar documentos", e))
}

#[axum::debug_handler]
async fn save_draft_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveDraftPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let doc_type = DocumentType::parse(&payload.doc_type).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Tipo de documento inválido: '{}'", payload.doc_type),
        )
    })?;

    let unknown = documents::unknown_fields(doc_type, &payload.fields);
    if !unknown.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Campos não reconhecidos para {}: {}", doc_type.acronym(), unknown.join(", ")),
        ));
    }

    let document = documents::save_draft(&state.pool, &payload.user_id, doc_type, payload.fields)
        .await
        .map_err(|e| internal_error("Erro ao salvar documento", e))?;
    Ok((StatusCode::CREATED, Json(document)))
}

async fn load_document(state: &AppState, id: &str) -> Result<Document, ApiError> {
    documents::find_by_id(&state.pool, id)
        .await
        .map_err(|e| internal_error("Erro ao carregar documento", e))?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Documento não encontrado."))
}

#[axum::debug_handler]
async fn get_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    load_document(&state, &id).await.map(Json)
}

#[axum::debug_handler]
async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let payload = json_body(payload)?;
    let status = DocumentStatus::from_str(payload.status.trim()).map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Status inválido: '{}'", payload.status),
        )
    })?;

    documents::update_status(&state.pool, &id, status)
        .await
        .map_err(|e| internal_error("Erro ao atualizar documento", e))?
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Documento não encontrado."))
}

#[axum::debug_handler]
async fn download_document_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let document = load_document(&state, &id).await?;
    let disposition = content_disposition(&format!("{}.txt", document.title));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.generated_text.unwrap_or_default(),
    )
        .into_response())
}

#[axum::debug_handler]
async fn search_law_articles_handler(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<LawArticle>>, ApiError> {
    let query = query_params(query)?;
    knowledge_base::search(&state.pool, &query.q)
        .await
        .map(Json)
        .map_err(|e| internal_error("Erro ao carregar artigos", e))
}

#[axum::debug_handler]
async fn get_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    profiles::find(&state.pool, &user_id)
        .await
        .map_err(|e| internal_error("Erro ao carregar perfil", e))?
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Perfil não encontrado."))
}

#[axum::debug_handler]
async fn upsert_profile_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    update: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let update = json_body(update)?;
    if update.email.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "O e-mail é obrigatório."));
    }
    profiles::upsert(&state.pool, &user_id, &update)
        .await
        .map(Json)
        .map_err(|e| internal_error("Erro ao atualizar perfil", e))
}

#[axum::debug_handler]
async fn list_templates_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateRecord>>, ApiError> {
    template_catalog::list_active(&state.pool)
        .await
        .map(Json)
        .map_err(|e| internal_error("Erro ao listar modelos", e))
}

// --- Utilitários ---

/// `attachment` com nome ASCII de reserva e o nome original em `filename*` (RFC 5987).
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let encoded = urlencoding::encode(filename);
    let value = format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}");
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, database, generation::test_support::ScriptedAnalyzer,
    };
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app_with(analyzer: ScriptedAnalyzer) -> (Router, AppState) {
        let pool = database::connect_in_memory().await.unwrap();
        database::ensure_schema(&pool).await.unwrap();
        knowledge_base::seed_defaults(&pool).await.unwrap();
        template_catalog::ensure_builtin(&pool).await.unwrap();
        let state = AppState {
            config: AppConfig::from_lookup(|_| None).unwrap(),
            pool,
            analyzer: Arc::new(analyzer),
        };
        (create_router(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec(), disposition)
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body, _) = send(app, request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn generate_document_returns_the_document_contract() {
        let (app, _) = app_with(ScriptedAnalyzer::new(
            r#"{"tipo_documento": "tr", "dados": {"objeto": "Segurança 24h"}, "titulo": "TR Segurança"}"#,
        ))
        .await;

        let (status, body) = send_json(
            &app,
            post_json(
                "/api/generate-document",
                json!({"message": "Crie um TR para segurança", "userId": "u1"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isDocument"], json!(true));
        assert_eq!(body["documentType"], json!("tr"));
        assert!(body["documentContent"].as_str().unwrap().contains("Segurança 24h"));

        let id = body["documentId"].as_str().unwrap();
        let (status, doc) = send_json(&app, get_req(&format!("/api/documents/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["status"], json!("completed"));
        assert_eq!(doc["title"], json!("TR Segurança"));
    }

    #[tokio::test]
    async fn generate_document_for_non_requests_returns_guidance() {
        let (app, _) = app_with(ScriptedAnalyzer::new(r#"{"erro": "Não é uma solicitação"}"#)).await;

        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "oi", "userId": "u1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isDocument"], json!(false));
        assert_eq!(body["response"], json!(generation::GUIDANCE_RESPONSE));
        assert!(body.get("documentId").is_none());
    }

    #[tokio::test]
    async fn generate_document_failures_are_500_with_message() {
        let (app, _) = app_with(ScriptedAnalyzer::new("resposta livre")).await;
        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "Gere um DFD", "userId": "u1"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["rawContent"], json!("resposta livre"));
        assert!(body["error"].as_str().unwrap().starts_with("Não foi possível interpretar"));

        let (app, _) = app_with(ScriptedAnalyzer::offline()).await;
        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "Gere um DFD", "userId": "u1"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            json!("Erro ao gerar documento: OpenAI API key não configurada")
        );
    }

    #[tokio::test]
    async fn conversation_flow_over_http() {
        let (app, _) = app_with(ScriptedAnalyzer::new(
            r#"{"tipo_documento": "etp", "dados": {"objeto": "Notebooks"}, "titulo": "ETP Notebooks"}"#,
        ))
        .await;

        let (status, created) =
            send_json(&app, post_json("/api/conversations", json!({"userId": "u1"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["messages"][0]["id"], json!("welcome"));
        let conv_id = created["conversation"]["id"].as_str().unwrap().to_string();

        let (status, history) = send_json(
            &app,
            get_req(&format!("/api/conversations/{conv_id}/messages?userId=u1")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);

        let (status, reply) = send_json(
            &app,
            post_json(
                &format!("/api/conversations/{conv_id}/messages"),
                json!({"userId": "u1", "content": "Preciso de um ETP para notebooks"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["documentType"], json!("etp"));
        assert_eq!(reply["userMessage"]["role"], json!("user"));

        let (_, history) = send_json(
            &app,
            get_req(&format!("/api/conversations/{conv_id}/messages?userId=u1")),
        )
        .await;
        assert_eq!(history.as_array().unwrap().len(), 2);

        let (_, list) = send_json(&app, get_req("/api/conversations?userId=u1")).await;
        assert_eq!(list[0]["title"], json!("Preciso de um ETP para notebooks"));

        let (status, _) = send_json(
            &app,
            get_req(&format!("/api/conversations/{conv_id}/messages?userId=outro")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn drafts_status_and_download() {
        let (app, _) = app_with(ScriptedAnalyzer::new("{}")).await;

        let (status, body) = send_json(
            &app,
            post_json(
                "/api/documents",
                json!({"userId": "u1", "type": "dfd", "fields": {"objeto": "Café"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], json!("draft"));
        assert_eq!(body["title"], json!("DFD - Café"));
        let id = body["id"].as_str().unwrap().to_string();

        let (status, _) = send_json(
            &app,
            post_json("/api/documents", json!({"userId": "u1", "type": "edital"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send_json(
            &app,
            post_json(
                "/api/documents",
                json!({"userId": "u1", "type": "dfd", "fields": {"penalidades": "x"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let patch_status = |status: &str| {
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/documents/{id}/status"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": status }).to_string()))
                .unwrap()
        };
        let (status, body) = send_json(&app, patch_status("archived")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("archived"));
        let (status, _) = send_json(&app, patch_status("apagado")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body, disposition) =
            send(&app, get_req(&format!("/api/documents/{id}/download"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        let disposition = disposition.unwrap();
        assert!(disposition.starts_with("attachment; filename=\"DFD - Caf_.txt\""));
        assert!(disposition.contains("filename*=UTF-8''DFD%20-%20Caf%C3%A9.txt"));

        let (status, _) = send_json(&app, get_req("/api/documents/nao-existe")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send_json(&app, get_req("/api/documents?userId=u1")).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn law_articles_profiles_and_templates() {
        let (app, _) = app_with(ScriptedAnalyzer::new("{}")).await;

        let (status, all) = send_json(&app, get_req("/api/law-articles")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 4);
        let (_, found) = send_json(&app, get_req("/api/law-articles?q=edital")).await;
        assert_eq!(found[0]["articleNumber"], json!("54"));

        let (status, _) = send_json(&app, get_req("/api/profiles/u1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let put = Request::builder()
            .method("PUT")
            .uri("/api/profiles/u1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"email": "joao@camara.gov.br", "fullName": "João", "role": "gestor"})
                    .to_string(),
            ))
            .unwrap();
        let (status, profile) = send_json(&app, put).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["role"], json!("gestor"));
        let (status, profile) = send_json(&app, get_req("/api/profiles/u1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["fullName"], json!("João"));

        let (_, templates) = send_json(&app, get_req("/api/templates")).await;
        assert_eq!(templates.as_array().unwrap().len(), 3);

        let (status, health) = send_json(&app, get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], json!("ok"));
    }

    #[tokio::test]
    async fn malformed_requests_answer_with_json_errors() {
        let (app, _) = app_with(ScriptedAnalyzer::new("{}")).await;

        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "Gere um DFD"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("userId"));

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/generate-document")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send_json(&app, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send_json(&app, get_req("/api/documents")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("userId"));

        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "  ", "userId": "u1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("A mensagem não pode ser vazia."));
    }

    #[tokio::test]
    async fn unknown_document_type_is_500_and_writes_nothing() {
        let (app, state) = app_with(ScriptedAnalyzer::new(
            r#"{"tipo_documento": "edital", "dados": {"objeto": "Obras"}}"#,
        ))
        .await;

        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "Gere um edital", "userId": "u1"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            json!("Erro ao gerar documento: Tipo de documento desconhecido: 'edital'")
        );
        assert!(documents::list_by_user(&state.pool, "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_generation_error() {
        let (app, state) = app_with(ScriptedAnalyzer::new(
            r#"{"tipo_documento": "dfd", "dados": {"objeto": "Café"}}"#,
        ))
        .await;
        sqlx::query("DROP TABLE documents")
            .execute(&state.pool)
            .await
            .unwrap();

        let (status, body) = send_json(
            &app,
            post_json("/api/generate-document", json!({"message": "Gere um DFD", "userId": "u1"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Erro ao gerar documento: Erro ao salvar documento: "));
        assert!(body.get("rawContent").is_none());
    }

    #[test]
    fn download_names_keep_an_ascii_fallback() {
        let value = content_disposition("ETP - Aquisição d'água.txt");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"ETP - Aquisi__o d'_gua.txt\"; \
             filename*=UTF-8''ETP%20-%20Aquisi%C3%A7%C3%A3o%20d%27%C3%A1gua.txt"
        );
    }
}
