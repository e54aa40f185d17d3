//! Dialogue state transitions.

use super::reply::{Action, Reply};
use crate::followup::FollowupResolver;
use crate::knowledge::KnowledgeBase;
use crate::messages::{MessageKey, Messages};
use crate::session::{DialogueState, Session};

/// What a turn should do, given the session state and the inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Show the next step (or the closing message).
    Advance,
    /// Interpret the message as the answer to the pending follow-up.
    AnswerFollowup,
    /// Resolve the message to an intent, falling back to the assistant.
    MatchIntent,
}

/// Transition table: an explicit `next` always advances; otherwise the state decides.
pub fn route(state: &DialogueState, action: Option<Action>) -> Route {
    match (action, state) {
        (Some(Action::Next), _) => Route::Advance,
        (None, DialogueState::AwaitingFollowup { .. }) => Route::AnswerFollowup,
        (None, DialogueState::Idle | DialogueState::Stepping) => Route::MatchIntent,
    }
}

/// Applies intent starts, step advances and follow-up answers to a session.
#[derive(Debug, Clone, Default)]
pub struct DialogueController {
    messages: Messages,
}

impl DialogueController {
    pub fn new(messages: Messages) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Starts `intent`, showing its first step.
    ///
    /// An intent missing from `kb` leaves the session untouched and yields the
    /// localized "no offline instructions" message.
    pub fn start_intent(&self, session: &mut Session, intent: &str, kb: &KnowledgeBase) -> Reply {
        let Some(entry) = kb.get(intent) else {
            tracing::warn!(
                session_id = %session.id,
                intent,
                lang = kb.lang(),
                "intent not found in knowledge base"
            );
            return Reply::UnknownIntent {
                text: self.text(session, MessageKey::UnknownIntent),
            };
        };

        session.intent = Some(intent.to_string());
        session.steps = entry.steps.clone();
        session.current_step = (!session.steps.is_empty()).then_some(0);

        let text = session.steps.first().cloned().unwrap_or_default();
        let has_next = session.steps.len() > 1;

        tracing::info!(session_id = %session.id, intent, steps = session.steps.len(), "intent started");

        match entry.first_followup() {
            Some(followup) => {
                session.state = DialogueState::AwaitingFollowup {
                    followup: followup.clone(),
                };
                Reply::AwaitingFollowup {
                    text,
                    question: followup.question.clone(),
                    has_next,
                }
            }
            None => {
                session.state = DialogueState::Stepping;
                Reply::Started { text, has_next }
            }
        }
    }

    /// Shows the next step, or the closing message once the steps are exhausted.
    ///
    /// Advancing past the end is idempotent: the cursor stays on the last step
    /// and the same closing message is returned every time.
    pub fn advance_step(&self, session: &mut Session, kb: &KnowledgeBase) -> Reply {
        if let Some(next) = session.next_step_index() {
            session.current_step = Some(next);
            tracing::debug!(session_id = %session.id, step = next, "advanced");
            return Reply::Step {
                text: session.steps[next].clone(),
                has_next: session.has_next(),
            };
        }

        let escalation = session
            .intent
            .as_deref()
            .and_then(|intent| kb.get(intent))
            .and_then(|entry| entry.escalation.clone());

        Reply::Done {
            text: escalation.unwrap_or_else(|| self.text(session, MessageKey::Done)),
        }
    }

    /// Branches on the answer to the pending follow-up.
    ///
    /// A declared branch for the answer's polarity starts that intent; with no
    /// such branch the follow-up is dropped and the current sequence advances.
    pub fn answer_followup(
        &self,
        session: &mut Session,
        answer: &str,
        kb: &KnowledgeBase,
        resolver: &FollowupResolver,
    ) -> Reply {
        let Some(followup) = session.followup_meta().cloned() else {
            return self.advance_step(session, kb);
        };

        let polarity = resolver.classify(answer, &session.lang);
        let branch = if polarity.is_positive() {
            followup.yes_intent
        } else {
            followup.no_intent
        };

        tracing::debug!(session_id = %session.id, ?polarity, branch = ?branch, "follow-up answered");

        match branch {
            Some(intent) => self.start_intent(session, &intent, kb),
            None => {
                session.clear_followup();
                self.advance_step(session, kb)
            }
        }
    }

    fn text(&self, session: &Session, key: MessageKey) -> String {
        self.messages.text(&session.lang, key).to_string()
    }
}
