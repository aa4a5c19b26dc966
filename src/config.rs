//! Carregamento e gestão da configuração da aplicação (banco + LLM).

use std::env;
use anyhow::{anyhow, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum LlmProvider {
    OpenAI,
    Gemini,
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!("Provedor LLM não suportado: {other}")),
        }
    }
}

/// Configuração completa da aplicação.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_addr: String,

    pub llm_provider: LlmProvider,
    pub llm_chat_model: String,
    pub llm_temperature: f64,
    /// Apenas indica se `OPENAI_API_KEY` existe; o valor fica no ambiente.
    pub openai_api_key_present: bool,
}

impl AppConfig {
    /// Carrega a configuração a partir das variáveis de ambiente (usando .env se existir).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca arbitrária.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://licitaia.db?mode=rwc".to_string());
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("DATABASE_MAX_CONNECTIONS inválido: {raw}"))?,
            None => 5,
        };

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:3322".to_string());

        let llm_provider_str = lookup("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
        let llm_provider = LlmProvider::from_str(&llm_provider_str)?;

        let llm_chat_model =
            lookup("LLM_CHAT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let llm_temperature = match lookup("LLM_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| anyhow!("LLM_TEMPERATURE inválido: {raw}"))?,
            None => 0.3,
        };

        let openai_api_key_present = lookup("OPENAI_API_KEY")
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);

        Ok(Self {
            database_url,
            database_max_connections,
            server_addr,
            llm_provider,
            llm_chat_model,
            llm_temperature,
            openai_api_key_present,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.database_url, "sqlite://licitaia.db?mode=rwc");
        assert_eq!(cfg.database_max_connections, 5);
        assert_eq!(cfg.server_addr, "127.0.0.1:3322");
        assert_eq!(cfg.llm_provider, LlmProvider::OpenAI);
        assert_eq!(cfg.llm_chat_model, "gpt-4o-mini");
        assert!((cfg.llm_temperature - 0.3).abs() < f64::EPSILON);
        assert!(!cfg.openai_api_key_present);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(!cfg.openai_api_key_present);

        let cfg = AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert!(cfg.openai_api_key_present);
    }

    #[test]
    fn rejects_unknown_provider_and_bad_numbers() {
        assert!(AppConfig::from_lookup(lookup_from(&[("LLM_PROVIDER", "watson")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("LLM_TEMPERATURE", "quente")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "-1")])).is_err()
        );
    }

    #[test]
    fn provider_names_are_case_insensitive() {
        assert_eq!(LlmProvider::from_str(" Gemini ").unwrap(), LlmProvider::Gemini);
        assert_eq!(LlmProvider::from_str("OLLAMA").unwrap(), LlmProvider::Ollama);
    }
}
