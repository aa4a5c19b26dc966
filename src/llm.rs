//! Abstração sobre o Rig para classificar pedidos e extrair os campos dos documentos.
//! Por enquanto só o OpenAI está implementado; Gemini/Ollama ficam preparados para o futuro.

use crate::config::{AppConfig, LlmProvider};
use crate::models::DocumentType;
use async_trait::async_trait;
use rig::completion::Prompt;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

const EXTRACTION_PROMPT: &str = r#"
Você é um especialista em licitações públicas. Analise a mensagem do usuário e extraia informações para gerar um documento (DFD, ETP ou TR).

Responda APENAS com um JSON válido no seguinte formato:
{
  "tipo_documento": "dfd|etp|tr",
  "dados": {
    "objeto": "texto",
    "descricao_necessidade": "texto",
    "justificativa": "texto",
    "valor_estimado": "texto",
    "prazo_execucao": "texto",
    "modalidade_licitacao": "texto",
    "criterio_julgamento": "texto",
    "especificacoes_tecnicas": "texto",
    "especificacoes": "texto",
    "obrigacoes_contratada": "texto",
    "obrigacoes_contratante": "texto",
    "forma_pagamento": "texto",
    "penalidades": "texto",
    "criterios_aceitacao": "texto",
    "garantias": "texto",
    "descricao_detalhada": "texto"
  },
  "titulo": "título do documento"
}

Se a mensagem não for uma solicitação de documento, retorne: {"erro": "Não é uma solicitação de documento"}
"#;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("OpenAI API key não configurada")]
    MissingApiKey,
    #[error("Provedor LLM {0:?} ainda não implementado para chat")]
    UnsupportedProvider(LlmProvider),
    #[error("Não foi possível interpretar a resposta da OpenAI. Tente novamente ou refine sua solicitação.")]
    Unparsable { raw: String, reason: String },
    #[error("Tipo de documento desconhecido: '{0}'")]
    UnknownDocumentType(String),
    #[error("Falha na chamada ao modelo: {0}")]
    Llm(#[source] anyhow::Error),
}

/// Pedido de documento identificado pelo modelo.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRequest {
    pub doc_type: DocumentType,
    pub fields: Map<String, Value>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestAnalysis {
    /// A mensagem não pede um documento.
    NotDocument,
    Document(DocumentRequest),
}

/// Formato bruto devolvido pelo modelo.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    tipo_documento: Option<String>,
    dados: Option<Map<String, Value>>,
    titulo: Option<String>,
    erro: Option<Value>,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Remove as cercas de Markdown que alguns modelos colocam em volta do JSON.
fn strip_code_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Interpreta a resposta do modelo.
pub fn parse_analysis(raw: &str) -> Result<RequestAnalysis, AnalysisError> {
    let parsed: RawAnalysis =
        serde_json::from_str(strip_code_fences(raw)).map_err(|e| AnalysisError::Unparsable {
            raw: raw.to_string(),
            reason: e.to_string(),
        })?;

    if parsed.erro.as_ref().is_some_and(is_truthy) {
        return Ok(RequestAnalysis::NotDocument);
    }

    let tipo = parsed.tipo_documento.unwrap_or_default();
    let doc_type =
        DocumentType::parse(&tipo).ok_or_else(|| AnalysisError::UnknownDocumentType(tipo))?;

    let title = parsed
        .titulo
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(RequestAnalysis::Document(DocumentRequest {
        doc_type,
        fields: parsed.dados.unwrap_or_default(),
        title,
    }))
}

/// Classifica uma mensagem livre e extrai os campos do documento pedido.
#[async_trait]
pub trait RequestAnalyzer: Send + Sync {
    /// `false` quando não há como falar com o modelo (ex.: sem chave).
    fn is_available(&self) -> bool {
        true
    }

    async fn analyze(&self, message: &str) -> Result<RequestAnalysis, AnalysisError>;
}

/// Gestor do LLM de chat.
#[derive(Debug, Clone)]
pub struct LlmManager {
    pub provider: LlmProvider,
    pub chat_model: String,
    pub temperature: f64,
    api_key_present: bool,
}

impl LlmManager {
    /// Constrói o manager a partir da configuração.
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            provider: cfg.llm_provider.clone(),
            chat_model: cfg.llm_chat_model.clone(),
            temperature: cfg.llm_temperature,
            api_key_present: cfg.openai_api_key_present,
        }
    }

    async fn complete_with_openai(&self, message: &str) -> Result<String, AnalysisError> {
        use rig::providers::openai;
        // Trait para client.agent(...)
        use rig::client::CompletionClient as _;

        if !self.api_key_present {
            return Err(AnalysisError::MissingApiKey);
        }

        let client = openai::Client::from_env();

        let model_name = if self.chat_model.is_empty() {
            "gpt-4o-mini"
        } else {
            self.chat_model.as_str()
        };

        let agent = client
            .agent(model_name)
            .preamble(EXTRACTION_PROMPT)
            .temperature(self.temperature)
            .build();

        agent
            .prompt(message)
            .await
            .map_err(|e| AnalysisError::Llm(e.into()))
    }
}

#[async_trait]
impl RequestAnalyzer for LlmManager {
    fn is_available(&self) -> bool {
        self.api_key_present && self.provider == LlmProvider::OpenAI
    }

    async fn analyze(&self, message: &str) -> Result<RequestAnalysis, AnalysisError> {
        let raw = match self.provider {
            LlmProvider::OpenAI => self.complete_with_openai(message).await?,
            ref other => return Err(AnalysisError::UnsupportedProvider(other.clone())),
        };

        debug!("Conteúdo retornado pelo modelo: {raw}");

        parse_analysis(&raw).inspect_err(|e| {
            if let AnalysisError::Unparsable { reason, .. } = e {
                warn!("Não foi possível interpretar a resposta do modelo: {reason}. Resposta: '{raw}'");
            }
        })
    }
}
