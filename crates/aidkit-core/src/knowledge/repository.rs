//! Knowledge base repository trait.

use super::model::KnowledgeBase;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of language-specific knowledge bases.
///
/// Implementations cache each catalog for the process lifetime, keyed by the
/// language code the caller asked for, and substitute the default language's
/// catalog when the requested one does not exist.
#[async_trait]
pub trait KnowledgeBaseRepository: Send + Sync {
    /// Loads the catalog for `lang`.
    ///
    /// # Errors
    ///
    /// Returns `AidError::Configuration` when neither the requested catalog
    /// nor the default catalog can be read and parsed.
    async fn load(&self, lang: &str) -> Result<Arc<KnowledgeBase>>;
}
