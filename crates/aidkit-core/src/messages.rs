//! Localized system messages.

use std::collections::HashMap;
use strum::{AsRefStr, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Language used when a message has no translation for the requested one.
pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKey {
    /// The requested intent has no offline instructions.
    UnknownIntent,
    /// Generic closing message after the last step.
    Done,
    /// The generative service could not answer.
    ServiceUnavailable,
    /// The request could not be processed at all.
    ServerError,
}

/// Message catalog keyed by language and message.
#[derive(Debug, Clone)]
pub struct Messages {
    catalog: HashMap<(String, MessageKey), String>,
}

impl Default for Messages {
    fn default() -> Self {
        let mut messages = Self {
            catalog: HashMap::new(),
        };
        messages.insert(
            "en",
            MessageKey::UnknownIntent,
            "I don’t have specific instructions in my offline knowledge base. Trying AI assistant...",
        );
        messages.insert(
            "en",
            MessageKey::Done,
            "Those are the steps. If the problem continues or is severe, please seek emergency care.",
        );
        messages.insert(
            "en",
            MessageKey::ServiceUnavailable,
            "⚠️ Sorry, AI service is not available right now.",
        );
        messages.insert(
            "en",
            MessageKey::ServerError,
            "⚠️ Sorry, something went wrong. Please try again.",
        );
        messages.insert(
            "ti",
            MessageKey::UnknownIntent,
            "ኣብ ካብ መስመር ወጻኢ ፍልጠት የብለይን። ኣሎ AI ሓጋዚ ንምርካብ...",
        );
        messages.insert(
            "ti",
            MessageKey::Done,
            "እቶም ስጉምትታት እዮም። ጸገም እንተቐጺሉ ወይ ከቢድ እንተኾይኑ ህጹጽ ክንክን ድለዩ።",
        );
        messages
    }
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a message.
    pub fn insert(&mut self, lang: &str, key: MessageKey, text: impl Into<String>) {
        self.catalog.insert((lang.to_string(), key), text.into());
    }

    /// The message in `lang`, only if that exact translation exists.
    pub fn localized(&self, lang: &str, key: MessageKey) -> Option<&str> {
        self.catalog
            .get(&(lang.to_string(), key))
            .map(String::as_str)
    }

    /// The message in `lang`, falling back to English.
    pub fn text(&self, lang: &str, key: MessageKey) -> &str {
        self.localized(lang, key)
            .or_else(|| self.localized(FALLBACK_LANGUAGE, key))
            .unwrap_or_else(|| <&'static str>::from(key))
    }

    /// Keys that have no translation in `lang`.
    pub fn missing(&self, lang: &str) -> Vec<MessageKey> {
        MessageKey::iter()
            .filter(|key| self.localized(lang, *key).is_none())
            .collect()
    }
}
