//! Configuration loading and component wiring.

use crate::cli::Cli;
use aidkit_application::ChatUseCase;
use aidkit_core::config::AppConfig;
use aidkit_core::error::{AidError, Result};
use aidkit_core::fallback::FallbackBridge;
use aidkit_core::matcher::{IntentMatcher, WeightedRatio};
use aidkit_core::messages::Messages;
use aidkit_infrastructure::storage::ConfigStorage;
use aidkit_infrastructure::{AidPaths, JsonKnowledgeBaseRepository, MemorySessionStore};
use aidkit_interaction::{GoogleTranslateAgent, OpenAICompletionAgent};
use std::path::PathBuf;
use std::sync::Arc;

/// State shared by every request handler.
pub struct AppState {
    pub chat: ChatUseCase,
}

impl AppState {
    pub fn new(chat: ChatUseCase) -> Self {
        Self { chat }
    }
}

/// Resolves the configuration file and applies command line overrides.
///
/// An explicit `--config` must exist; the default location may be absent, in
/// which case defaults apply.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(AidError::configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            ConfigStorage::new(path.clone()).load_or_default()?
        }
        None => match AidPaths::config_file() {
            Ok(path) => ConfigStorage::new(path).load_or_default()?,
            Err(_) => AppConfig::default(),
        },
    };

    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(dir) = &cli.knowledge_dir {
        config.knowledge.directory = dir.display().to_string();
    }

    Ok(config)
}

/// Builds the application state, loading the default catalog up front.
///
/// A missing or malformed default catalog fails here, before the server binds.
pub async fn build_state(config: &AppConfig) -> Result<Arc<AppState>> {
    let knowledge = JsonKnowledgeBaseRepository::new(
        PathBuf::from(&config.knowledge.directory),
        config.knowledge.default_language.clone(),
    );
    let kb = knowledge.preload_default().await?;
    tracing::info!(
        lang = kb.lang(),
        intents = kb.len(),
        directory = %knowledge.directory().display(),
        "Default knowledge base ready"
    );

    let sessions = MemorySessionStore::from_config(&config.sessions);
    let translator = GoogleTranslateAgent::from_config(&config.translation);
    let completer = OpenAICompletionAgent::from_config(&config.completion);
    tracing::info!(
        model = completer.model(),
        configured = completer.is_configured(),
        "Completion service"
    );

    let messages = Messages::default();
    let fallback = FallbackBridge::new(
        Arc::new(translator),
        Arc::new(completer),
        &config.completion,
        messages.clone(),
    );

    let chat = ChatUseCase::new(Arc::new(knowledge), Arc::new(sessions), fallback, messages)
        .with_matcher(IntentMatcher::with_scorer(
            WeightedRatio,
            config.knowledge.fuzzy_threshold,
        ))
        .with_default_language(config.knowledge.default_language.clone());

    Ok(Arc::new(AppState::new(chat)))
}
