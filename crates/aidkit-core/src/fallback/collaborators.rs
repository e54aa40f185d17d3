//! Contracts for the hosted services the fallback path depends on.

use crate::error::Result;
use async_trait::async_trait;

/// Machine translation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` from `source` to `target`. `source` may be `"auto"`.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// A single-exchange completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_persona: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Generative text completion.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
