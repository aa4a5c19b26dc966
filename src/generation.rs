//! Geração de documentos a partir de uma mensagem livre:
//!   1. o LLM classifica o pedido e extrai os campos;
//!   2. o modelo do tipo pedido é preenchido;
//!   3. o documento é gravado como `completed`;
//!   4. a resposta do chat anuncia o resultado.

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    documents::{self, NewDocument},
    llm::{AnalysisError, RequestAnalysis, RequestAnalyzer},
    models::{DocumentStatus, DocumentType},
    templates,
};

/// Texto de ajuda devolvido quando a mensagem não pede um documento.
pub const GUIDANCE_RESPONSE: &str = r#"Entendi sua pergunta. Para gerar documentos, você pode solicitar:

📋 **"Gere um DFD para..."** - Documento de Formalização de Demanda
📋 **"Preciso de um ETP para..."** - Estudo Técnico Preliminar  
📋 **"Crie um TR para..."** - Termo de Referência

Exemplo: "Gere um DFD para contratação de serviços de limpeza, valor estimado R$ 50.000, prazo 12 meses"

Como posso ajudá-lo?"#;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Erro ao salvar documento: {0}")]
    Storage(#[source] anyhow::Error),
}

impl GenerationError {
    /// Resposta crua do modelo, quando o problema foi interpretá-la.
    pub fn raw_content(&self) -> Option<&str> {
        match self {
            GenerationError::Analysis(AnalysisError::Unparsable { raw, .. }) => Some(raw),
            _ => None,
        }
    }
}

/// Resultado no formato `{isDocument: false, response}` ou
/// `{isDocument: true, documentId, documentType, response, documentContent}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum GenerationOutcome {
    Guidance(GuidanceReply),
    Generated(GeneratedDocument),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceReply {
    pub is_document: bool,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub is_document: bool,
    pub document_id: String,
    pub document_type: DocumentType,
    pub response: String,
    pub document_content: String,
}

fn success_message(doc_type: DocumentType, title: &str) -> String {
    format!(
        r#"✅ **{}** gerado com sucesso!

**Título:** {}

O documento foi salvo na sua biblioteca e está pronto para download. Você pode:
- 📋 Visualizar na aba "Documentos"
- 📥 Fazer download em PDF
- ✏️ Editar se necessário

Gostaria que eu faça alguma alteração no documento ou precisa de ajuda com algo mais?"#,
        doc_type.display_name(),
        title
    )
}

/// Executa o fluxo completo de geração para uma mensagem do usuário.
pub async fn generate_document(
    analyzer: &dyn RequestAnalyzer,
    pool: &SqlitePool,
    message: &str,
    user_id: &str,
    conversation_id: Option<&str>,
) -> Result<GenerationOutcome, GenerationError> {
    let request = match analyzer.analyze(message).await? {
        RequestAnalysis::NotDocument => {
            return Ok(GenerationOutcome::Guidance(GuidanceReply {
                is_document: false,
                response: GUIDANCE_RESPONSE.to_string(),
            }));
        }
        RequestAnalysis::Document(request) => request,
    };

    let document_content = templates::render(request.doc_type, &request.fields);
    let title = request
        .title
        .clone()
        .unwrap_or_else(|| documents::default_title(request.doc_type, &request.fields));

    let document = documents::insert(
        pool,
        NewDocument {
            user_id: user_id.to_string(),
            conversation_id: conversation_id.map(str::to_string),
            title: title.clone(),
            doc_type: request.doc_type,
            status: DocumentStatus::Completed,
            content: serde_json::Value::Object(request.fields),
            generated_text: Some(document_content.clone()),
        },
    )
    .await
    .map_err(|e| {
        error!("Erro ao salvar documento: {e}");
        GenerationError::Storage(e)
    })?;

    info!(
        "Documento {} ({}) gerado para o usuário {}",
        document.id, request.doc_type, user_id
    );

    Ok(GenerationOutcome::Generated(GeneratedDocument {
        is_document: true,
        document_id: document.id,
        document_type: request.doc_type,
        response: success_message(request.doc_type, &title),
        document_content,
    }))
}
