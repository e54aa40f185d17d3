//! Knowledge base repository backed by a directory of JSON catalogs.
//!
//! # Directory Structure
//!
//! ```text
//! knowledge_base/
//! ├── en.json        # default language, required
//! └── ti.json        # optional, one file per language
//! ```

use aidkit_core::error::{AidError, Result};
use aidkit_core::knowledge::{KnowledgeBase, KnowledgeBaseRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Loads `<directory>/<lang>.json`, caching each catalog for the process lifetime.
pub struct JsonKnowledgeBaseRepository {
    directory: PathBuf,
    default_language: String,
    /// Keyed by the requested language, which may differ from the catalog's own.
    cache: RwLock<HashMap<String, Arc<KnowledgeBase>>>,
}

impl JsonKnowledgeBaseRepository {
    pub fn new(directory: impl Into<PathBuf>, default_language: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            default_language: default_language.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Loads the default catalog, failing fast on a misconfigured deployment.
    pub async fn preload_default(&self) -> Result<Arc<KnowledgeBase>> {
        let lang = self.default_language.clone();
        self.load(&lang).await
    }

    /// Language codes currently cached.
    pub async fn cached_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.cache.read().await.keys().cloned().collect();
        languages.sort();
        languages
    }

    async fn read_default(&self) -> Result<KnowledgeBase> {
        self.read_file(&self.default_language).await?.ok_or_else(|| {
            AidError::configuration(format!(
                "Default knowledge base not found at {}",
                self.catalog_path(&self.default_language).display()
            ))
        })
    }

    /// Reads one catalog; `Ok(None)` when the file does not exist.
    async fn read_file(&self, lang: &str) -> Result<Option<KnowledgeBase>> {
        let path = self.catalog_path(lang);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AidError::configuration(format!(
                    "Failed to read knowledge base at {}: {}",
                    path.display(),
                    err
                )));
            }
        };

        let kb = KnowledgeBase::from_json(lang, &content).map_err(|err| {
            AidError::configuration(format!(
                "Malformed knowledge base at {}: {}",
                path.display(),
                err
            ))
        })?;

        tracing::info!(lang, intents = kb.len(), "Loaded knowledge base from {}", path.display());
        Ok(Some(kb))
    }

    fn catalog_path(&self, lang: &str) -> PathBuf {
        self.directory.join(format!("{lang}.json"))
    }
}

#[async_trait]
impl KnowledgeBaseRepository for JsonKnowledgeBaseRepository {
    async fn load(&self, lang: &str) -> Result<Arc<KnowledgeBase>> {
        if let Some(kb) = self.cache.read().await.get(lang) {
            return Ok(kb.clone());
        }

        let kb = if lang == self.default_language {
            Arc::new(self.read_default().await?)
        } else {
            let own = if is_language_code(lang) {
                self.read_file(lang).await?
            } else {
                None
            };
            match own {
                Some(kb) => Arc::new(kb),
                // Every fallback language shares the cached default catalog.
                None => {
                    tracing::warn!(
                        requested = lang,
                        fallback = %self.default_language,
                        "No knowledge base for language, using default"
                    );
                    self.load(&self.default_language).await?
                }
            }
        };

        let mut cache = self.cache.write().await;
        Ok(cache.entry(lang.to_string()).or_insert(kb).clone())
    }
}

/// Language codes map to file names, so only plain identifiers are accepted.
fn is_language_code(lang: &str) -> bool {
    !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
