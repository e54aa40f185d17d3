//! Machine translation through the public Google Translate endpoint.
//!
//! The `translate_a/single` endpoint needs no key. Its response is a nested
//! JSON array whose first element lists translated segments:
//!
//! ```text
//! [[["Translated sentence. ", "Source sentence. ", ...], ["Next.", "Next.", ...]], null, "ti", ...]
//! ```

use aidkit_core::config::TranslationConfig;
use aidkit_core::error::{AidError, Result};
use aidkit_core::fallback::Translator;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "translation";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct GoogleTranslateAgent {
    client: Client,
    base_url: String,
}

impl GoogleTranslateAgent {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    fn request_url(&self, text: &str, source: &str, target: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|err| AidError::configuration(format!("Invalid translation URL: {err}")))
    }
}

#[async_trait]
impl Translator for GoogleTranslateAgent {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() || source == target {
            return Ok(text.to_string());
        }

        let url = self.request_url(text, source, target)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AidError::external(SERVICE, format!("Translate request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AidError::external(
                SERVICE,
                format!("Translate endpoint returned {status}"),
            ));
        }

        let body: Value = response.json().await.map_err(|err| {
            AidError::external(SERVICE, format!("Failed to parse translate response: {err}"))
        })?;

        tracing::debug!(source, target, "Translated text");
        parse_translation(&body)
    }
}

/// Concatenates the translated segments of a `translate_a/single` response.
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| AidError::external(SERVICE, "Unexpected translate response shape"))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(AidError::external(SERVICE, "Translate response had no text"));
    }
    Ok(translated)
}
