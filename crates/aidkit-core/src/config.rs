//! Application configuration model.
//!
//! Every field has a default, so an empty or partial `config.toml` is valid.

use serde::{Deserialize, Serialize};

/// Language of the catalog used when a requested language has none.
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub knowledge: KnowledgeConfig,
    pub sessions: SessionConfig,
    pub completion: CompletionConfig,
    pub translation: TranslationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Directory holding one `<lang>.json` catalog per language
    pub directory: String,
    pub default_language: String,
    /// Minimum fuzzy score for a keyword match (0-100)
    pub fuzzy_threshold: f64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            directory: "knowledge_base".to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            fuzzy_threshold: crate::matcher::DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of live sessions; the least recently used is evicted beyond it
    pub capacity: usize,
    /// Sessions idle longer than this are reaped
    pub idle_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            idle_timeout_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_persona: String,
    pub base_url: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 200,
            temperature: 0.5,
            system_persona: "You are a helpful health assistant. Be empathetic but concise."
                .to_string(),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub base_url: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com/translate_a/single".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.knowledge.fuzzy_threshold, 60.0);
        assert_eq!(config.completion.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [sessions]
            capacity = 5

            [completion]
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.sessions.capacity, 5);
        assert_eq!(config.sessions.idle_timeout_secs, 3600);
        assert_eq!(config.completion.temperature, 0.2);
        assert_eq!(config.completion.max_tokens, 200);
    }

    #[test]
    fn test_secret_config_parses() {
        let secret: SecretConfig =
            serde_json::from_str(r#"{"openai": {"api_key": "sk-test"}}"#).unwrap();
        let openai = secret.openai.unwrap();
        assert_eq!(openai.api_key, "sk-test");
        assert!(openai.model_name.is_none());
    }
}
