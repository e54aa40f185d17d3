//! Chat use case: one conversational turn.
//!
//! `ChatUseCase::handle_message` is the entry point for every inbound chat
//! message. It resolves the session, loads the catalog for the message's
//! language, routes the turn through the dialogue state machine and, when no
//! intent matches, hands the message to the generative fallback.

use aidkit_core::config::DEFAULT_LANGUAGE;
use aidkit_core::dialogue::{ChatRequest, ChatResponse, DialogueController, Reply, Route, route};
use aidkit_core::error::{AidError, Result};
use aidkit_core::fallback::FallbackBridge;
use aidkit_core::followup::FollowupResolver;
use aidkit_core::knowledge::KnowledgeBaseRepository;
use aidkit_core::matcher::IntentMatcher;
use aidkit_core::messages::{MessageKey, Messages};
use aidkit_core::session::{Session, SessionStore};
use std::sync::Arc;

/// Use case driving chat turns.
///
/// # Concurrency
///
/// The session's lock is held for the whole turn, external calls included,
/// so concurrent requests carrying the same session id are applied one after
/// the other. Requests for different sessions do not contend.
///
/// # Failures
///
/// Conversational failures never surface as errors: every call returns a
/// chat-shaped response. Anything that cannot be recovered in the dialogue
/// itself (a missing default catalog, an empty message) is logged and
/// answered with the localized server-error message.
pub struct ChatUseCase {
    knowledge: Arc<dyn KnowledgeBaseRepository>,
    sessions: Arc<dyn SessionStore>,
    matcher: IntentMatcher,
    resolver: FollowupResolver,
    controller: DialogueController,
    fallback: FallbackBridge,
    default_language: String,
}

impl ChatUseCase {
    pub fn new(
        knowledge: Arc<dyn KnowledgeBaseRepository>,
        sessions: Arc<dyn SessionStore>,
        fallback: FallbackBridge,
        messages: Messages,
    ) -> Self {
        Self {
            knowledge,
            sessions,
            matcher: IntentMatcher::new(),
            resolver: FollowupResolver::new(),
            controller: DialogueController::new(messages),
            fallback,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_matcher(mut self, matcher: IntentMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_resolver(mut self, resolver: FollowupResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Language assumed when a request carries an empty `lang`.
    pub fn with_default_language(mut self, lang: impl Into<String>) -> Self {
        self.default_language = lang.into();
        self
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Handles one chat message, creating the session on first contact.
    pub async fn handle_message(&self, request: ChatRequest) -> ChatResponse {
        let lang = self.request_language(&request.lang);
        let (handle, created) = self
            .sessions
            .resolve(request.session_id.as_deref(), &lang)
            .await;

        let mut session = handle.lock().await;
        if created && request.session_id.is_some() {
            tracing::debug!(
                requested = ?request.session_id,
                session_id = %session.id,
                "Unknown session id, started a new session"
            );
        }
        session.lang = lang;
        session.touch();

        match self.respond(&mut session, &request).await {
            Ok(reply) => ChatResponse::from_reply(session.id.clone(), &reply),
            Err(err) => {
                tracing::error!(session_id = %session.id, error = %err, "Chat turn failed");
                self.server_error(&session.id, &session.lang)
            }
        }
    }

    /// Answers a request body that could not be parsed.
    ///
    /// The caller still gets a chat-shaped payload, under a freshly minted session.
    pub async fn malformed_request(&self, reason: &str) -> ChatResponse {
        let handle = self.sessions.create(&self.default_language).await;
        let session = handle.lock().await;
        tracing::warn!(session_id = %session.id, reason, "Malformed chat request");
        self.server_error(&session.id, &session.lang)
    }

    async fn respond(&self, session: &mut Session, request: &ChatRequest) -> Result<Reply> {
        let kb = self.knowledge.load(&session.lang).await?;

        let reply = match route(&session.state, request.action()) {
            Route::Advance => self.controller.advance_step(session, &kb),
            Route::AnswerFollowup => {
                self.controller
                    .answer_followup(session, &request.message, &kb, &self.resolver)
            }
            Route::MatchIntent => {
                if request.message.trim().is_empty() {
                    return Err(AidError::malformed("message is empty"));
                }
                match self.matcher.find_match(&request.message, &kb) {
                    Some(found) => {
                        tracing::debug!(
                            session_id = %session.id,
                            intent = %found.intent,
                            keyword = %found.keyword,
                            kind = ?found.kind,
                            "Matched intent"
                        );
                        self.controller.start_intent(session, &found.intent, &kb)
                    }
                    None => {
                        tracing::info!(session_id = %session.id, lang = %session.lang, "No intent matched, using assistant");
                        Reply::Assistant {
                            text: self.fallback.fallback(&request.message, &session.lang).await,
                        }
                    }
                }
            }
        };

        Ok(reply)
    }

    fn request_language(&self, lang: &str) -> String {
        let lang = lang.trim();
        if lang.is_empty() {
            self.default_language.clone()
        } else {
            lang.to_string()
        }
    }

    fn server_error(&self, session_id: &str, lang: &str) -> ChatResponse {
        ChatResponse {
            session_id: session_id.to_string(),
            text: self
                .controller
                .messages()
                .text(lang, MessageKey::ServerError)
                .to_string(),
            awaiting: false,
            followup_question: None,
            has_next: false,
            done: None,
        }
    }
}
