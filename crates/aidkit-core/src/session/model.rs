//! Session domain model.

use crate::knowledge::Followup;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a conversation currently stands.
///
/// A session is `Idle` until its first intent starts. Starting an intent
/// with follow-ups moves it to `AwaitingFollowup`, which only an answer to
/// the question resolves; otherwise it is `Stepping` through the active
/// intent's instructions. Completion of a sequence is reported in the reply
/// only: the session stays `Stepping` with its last intent retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Idle,
    AwaitingFollowup {
        followup: Followup,
    },
    Stepping,
}

/// Per-conversation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Language of the most recent message
    pub lang: String,
    /// Currently active intent
    pub intent: Option<String>,
    /// Snapshot of the active intent's steps
    pub steps: Vec<String>,
    /// Index of the step last shown; `None` before any step was shown
    pub current_step: Option<usize>,
    pub state: DialogueState,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp of the last message (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    /// Creates an idle session with a freshly generated identifier.
    pub fn new(lang: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), lang)
    }

    pub fn with_id(id: impl Into<String>, lang: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            lang: lang.into(),
            intent: None,
            steps: Vec::new(),
            current_step: None,
            state: DialogueState::Idle,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn awaiting_followup(&self) -> bool {
        matches!(self.state, DialogueState::AwaitingFollowup { .. })
    }

    /// The pending follow-up, present exactly when `awaiting_followup()` is true.
    pub fn followup_meta(&self) -> Option<&Followup> {
        match &self.state {
            DialogueState::AwaitingFollowup { followup } => Some(followup),
            _ => None,
        }
    }

    /// Step index in the `-1`-based convention used on the wire and in logs.
    pub fn step_position(&self) -> i64 {
        self.current_step.map_or(-1, |index| index as i64)
    }

    /// Index of the step an advance would show, if one remains.
    pub fn next_step_index(&self) -> Option<usize> {
        let next = self.current_step.map_or(0, |index| index + 1);
        (next < self.steps.len()).then_some(next)
    }

    pub fn has_next(&self) -> bool {
        self.next_step_index().is_some()
    }

    /// Drops any pending follow-up without touching the step cursor.
    pub fn clear_followup(&mut self) {
        if self.awaiting_followup() {
            self.state = DialogueState::Stepping;
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
