//! Replies produced by a conversational turn, and their wire form.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::EnumString;

/// Outcome of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// First step of a newly started intent, with a pending yes/no question.
    AwaitingFollowup {
        text: String,
        question: String,
        has_next: bool,
    },
    /// First step of a newly started intent.
    Started { text: String, has_next: bool },
    /// A later step, reached by advancing.
    Step { text: String, has_next: bool },
    /// The step sequence is exhausted; carries the escalation or closing message.
    Done { text: String },
    /// The intent is not part of the loaded catalog.
    UnknownIntent { text: String },
    /// Produced by the generative fallback.
    Assistant { text: String },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::AwaitingFollowup { text, .. }
            | Reply::Started { text, .. }
            | Reply::Step { text, .. }
            | Reply::Done { text }
            | Reply::UnknownIntent { text }
            | Reply::Assistant { text } => text,
        }
    }

    pub fn awaiting(&self) -> bool {
        matches!(self, Reply::AwaitingFollowup { .. })
    }

    pub fn followup_question(&self) -> Option<&str> {
        match self {
            Reply::AwaitingFollowup { question, .. } => Some(question),
            _ => None,
        }
    }

    pub fn has_next(&self) -> bool {
        match self {
            Reply::AwaitingFollowup { has_next, .. }
            | Reply::Started { has_next, .. }
            | Reply::Step { has_next, .. } => *has_next,
            _ => false,
        }
    }

    /// Completion flag, reported only for replies produced by advancing.
    pub fn done(&self) -> Option<bool> {
        match self {
            Reply::Step { .. } => Some(false),
            Reply::Done { .. } => Some(true),
            _ => None,
        }
    }
}

/// Client-requested action accompanying a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Action {
    /// Show the next step of the active intent.
    #[strum(serialize = "next")]
    Next,
}

impl Action {
    /// Parses the optional wire value; unrecognized values mean "no action".
    pub fn parse(value: Option<&str>) -> Option<Self> {
        value.and_then(|raw| Action::from_str(raw).ok())
    }
}

fn default_lang() -> String {
    crate::config::DEFAULT_LANGUAGE.to_string()
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            lang: default_lang(),
            session_id: None,
            action: None,
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// A request asking for the next step.
    pub fn next(session_id: impl Into<String>) -> Self {
        Self {
            action: Some("next".to_string()),
            ..Self::new("").with_session(session_id)
        }
    }

    pub fn action(&self) -> Option<Action> {
        Action::parse(self.action.as_deref())
    }
}

/// Response body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub text: String,
    pub awaiting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_question: Option<String>,
    pub has_next: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl ChatResponse {
    pub fn from_reply(session_id: impl Into<String>, reply: &Reply) -> Self {
        Self {
            session_id: session_id.into(),
            text: reply.text().to_string(),
            awaiting: reply.awaiting(),
            followup_question: reply.followup_question().map(str::to_string),
            has_next: reply.has_next(),
            done: reply.done(),
        }
    }
}
