//! Modelos fixos de DFD, ETP e TR e o preenchimento dos marcadores `{campo}`.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::models::DocumentType;

/// Texto usado em todo marcador que ficou sem valor.
pub const NOT_SPECIFIED: &str = "Não especificado";

const DFD_TEMPLATE: &str = r#"
# DOCUMENTO DE FORMALIZAÇÃO DE DEMANDA (DFD)

## 1. DESCRIÇÃO DA NECESSIDADE
{descricao_necessidade}

## 2. JUSTIFICATIVA
{justificativa}

## 3. OBJETO DA CONTRATAÇÃO
{objeto}

## 4. ESTIMATIVA DE CUSTOS
Valor estimado: {valor_estimado}

## 5. PRAZO DE EXECUÇÃO
{prazo_execucao}

## 6. MODALIDADE LICITATÓRIA SUGERIDA
{modalidade_licitacao}

## 7. CRITÉRIO DE JULGAMENTO
{criterio_julgamento}

## 8. FUNDAMENTAÇÃO LEGAL
Este documento está em conformidade com o Art. 18 da Lei 14.133/2021.
"#;

const ETP_TEMPLATE: &str = r#"
# ESTUDO TÉCNICO PRELIMINAR (ETP)

## 1. OBJETO
{objeto}

## 2. JUSTIFICATIVA DA CONTRATAÇÃO
{justificativa}

## 3. DESCRIÇÃO DETALHADA
{descricao_detalhada}

## 4. ESPECIFICAÇÕES TÉCNICAS
{especificacoes_tecnicas}

## 5. ANÁLISE DE VIABILIDADE
Esta contratação é viável considerando os aspectos técnicos, econômicos e operacionais apresentados.

## 6. ESTIMATIVA DE CUSTOS
Valor estimado: {valor_estimado}

## 7. PRAZO DE EXECUÇÃO
{prazo_execucao}

## 8. FORMA DE PAGAMENTO
{forma_pagamento}

## 9. GARANTIAS
{garantias}

## 10. SUSTENTABILIDADE AMBIENTAL
A contratação observará critérios de sustentabilidade ambiental conforme legislação vigente.

## 11. FUNDAMENTAÇÃO LEGAL
Este documento está em conformidade com o Art. 18, § 1º da Lei 14.133/2021.
"#;

const TR_TEMPLATE: &str = r#"
# TERMO DE REFERÊNCIA (TR)

## 1. OBJETO
{objeto}

## 2. ESPECIFICAÇÕES
{especificacoes}

## 3. OBRIGAÇÕES DA CONTRATADA
{obrigacoes_contratada}

## 4. OBRIGAÇÕES DO CONTRATANTE
{obrigacoes_contratante}

## 5. PRAZO DE EXECUÇÃO
{prazo_execucao}

## 6. FORMA DE PAGAMENTO
{forma_pagamento}

## 7. PENALIDADES
{penalidades}

## 8. CRITÉRIOS DE ACEITAÇÃO
{criterios_aceitacao}

## 9. FISCALIZAÇÃO
A execução do contrato será acompanhada e fiscalizada por servidor designado pela Administração.

## 10. FUNDAMENTAÇÃO LEGAL
Este documento está em conformidade com o Art. 40 da Lei 14.133/2021.
"#;

impl DocumentType {
    /// Modelo Markdown com os marcadores `{campo}`.
    pub fn template(&self) -> &'static str {
        match self {
            DocumentType::Dfd => DFD_TEMPLATE,
            DocumentType::Etp => ETP_TEMPLATE,
            DocumentType::Tr => TR_TEMPLATE,
        }
    }

    /// Campos preenchíveis deste tipo, na ordem em que aparecem no modelo.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Dfd => &[
                "descricao_necessidade",
                "justificativa",
                "objeto",
                "valor_estimado",
                "prazo_execucao",
                "modalidade_licitacao",
                "criterio_julgamento",
            ],
            DocumentType::Etp => &[
                "objeto",
                "justificativa",
                "descricao_detalhada",
                "especificacoes_tecnicas",
                "valor_estimado",
                "prazo_execucao",
                "forma_pagamento",
                "garantias",
            ],
            DocumentType::Tr => &[
                "objeto",
                "especificacoes",
                "obrigacoes_contratada",
                "obrigacoes_contratante",
                "prazo_execucao",
                "forma_pagamento",
                "penalidades",
                "criterios_aceitacao",
            ],
        }
    }
}

fn leftover_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]+\}").expect("regex de marcador válida"))
}

/// Converte um valor extraído em texto. `None` para valores "vazios"
/// (string vazia, zero, `false`, `null`), que não substituem nada.
fn substitution_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Preenche o modelo do tipo informado com os campos extraídos.
///
/// Os campos são aplicados na ordem do mapa; cada `{chave}` é trocado em
/// todas as ocorrências. Ao final, qualquer `{...}` restante vira
/// [`NOT_SPECIFIED`].
pub fn render(doc_type: DocumentType, fields: &Map<String, Value>) -> String {
    let mut text = doc_type.template().to_string();

    for (key, value) in fields {
        if let Some(replacement) = substitution_text(value) {
            let marker = format!("{{{key}}}");
            text = text.replace(&marker, &replacement);
        }
    }

    leftover_placeholder()
        .replace_all(&text, regex::NoExpand(NOT_SPECIFIED))
        .into_owned()
}
