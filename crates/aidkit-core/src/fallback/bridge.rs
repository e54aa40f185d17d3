//! Generative fallback for input no intent matches.

use super::collaborators::{CompletionRequest, Completer, Translator};
use crate::config::CompletionConfig;
use crate::messages::{MessageKey, Messages};
use std::sync::Arc;

/// Language the completion service is queried in.
pub const PIVOT_LANGUAGE: &str = "en";

/// Routes unmatched input through translation and completion.
///
/// Collaborator failures never escape: a failed translation passes the text
/// through unchanged and a failed completion is replaced by the localized
/// "service unavailable" message.
pub struct FallbackBridge {
    translator: Arc<dyn Translator>,
    completer: Arc<dyn Completer>,
    messages: Messages,
    system_persona: String,
    max_tokens: u32,
    temperature: f32,
}

impl FallbackBridge {
    pub fn new(
        translator: Arc<dyn Translator>,
        completer: Arc<dyn Completer>,
        config: &CompletionConfig,
        messages: Messages,
    ) -> Self {
        Self {
            translator,
            completer,
            messages,
            system_persona: config.system_persona.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Answers `input` (written in `lang`) with the completion service, in `lang`.
    pub async fn fallback(&self, input: &str, lang: &str) -> String {
        let needs_translation = lang != PIVOT_LANGUAGE;

        let prompt = if needs_translation {
            self.translate_or_pass(input, lang, PIVOT_LANGUAGE).await
        } else {
            input.to_string()
        };

        let request = CompletionRequest {
            prompt,
            system_persona: self.system_persona.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let answer = match self.completer.complete(&request).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, lang, "completion failed, using unavailable message");
                if let Some(localized) = self.messages.localized(lang, MessageKey::ServiceUnavailable)
                {
                    return localized.to_string();
                }
                self.messages
                    .text(PIVOT_LANGUAGE, MessageKey::ServiceUnavailable)
                    .to_string()
            }
        };

        if needs_translation {
            self.translate_or_pass(&answer, PIVOT_LANGUAGE, lang).await
        } else {
            answer
        }
    }

    async fn translate_or_pass(&self, text: &str, source: &str, target: &str) -> String {
        match self.translator.translate(text, source, target).await {
            Ok(translated) => translated,
            Err(err) => {
                tracing::warn!(error = %err, source, target, "translation failed, passing text through");
                text.to_string()
            }
        }
    }
}
