use aidkit_application::ChatUseCase;
use aidkit_core::config::CompletionConfig;
use aidkit_core::dialogue::{ChatRequest, ChatResponse};
use aidkit_core::error::{AidError, Result};
use aidkit_core::fallback::{CompletionRequest, Completer, FallbackBridge, Translator};
use aidkit_core::knowledge::{KnowledgeBase, KnowledgeBaseRepository};
use aidkit_core::messages::{MessageKey, Messages};
use aidkit_core::session::SessionStore;
use aidkit_infrastructure::MemorySessionStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CATALOG: &str = r#"{
    "bleeding": {
        "keywords": ["bleeding", "blood"],
        "steps": ["Apply firm pressure.", "Raise the limb.", "Keep pressure for 10 minutes."],
        "followups": [
            {"question": "Is the bleeding heavy?", "yes_intent": "severe_bleeding", "no_intent": "minor_cut"}
        ],
        "escalation": "Call emergency services if the bleeding does not stop."
    },
    "severe_bleeding": {
        "keywords": ["spurting"],
        "steps": ["Call emergency services.", "Press hard on the wound."]
    },
    "minor_cut": {
        "keywords": ["small cut"],
        "steps": ["Clean the cut.", "Cover it with a bandage."]
    },
    "sprain": {
        "keywords": ["sprain", "twisted ankle"],
        "steps": ["A", "B", "C"]
    },
    "fever": {
        "steps": ["Rest and drink fluids."],
        "followups": [{"question": "Is it above 39 degrees?", "yes_intent": "high_fever"}]
    },
    "high_fever": {
        "keywords": [],
        "steps": ["See a doctor today."]
    },
    "wound": {
        "steps": ["Rinse the wound."],
        "followups": [{"question": "Is it deep?", "yes_intent": "deep_wound"}]
    }
}"#;

/// A catalog whose only keyword shares no letters with "what time is it".
const BURN_CATALOG: &str = r#"{"burn": {"keywords": ["burn"], "steps": ["Cool the burn."]}}"#;

// ============================================================================
// Mock collaborators
// ============================================================================

struct StaticKnowledge {
    catalogs: HashMap<String, Arc<KnowledgeBase>>,
}

impl StaticKnowledge {
    fn english(json: &str) -> Self {
        let kb = KnowledgeBase::from_json("en", json).unwrap();
        Self {
            catalogs: HashMap::from([("en".to_string(), Arc::new(kb))]),
        }
    }

    fn empty() -> Self {
        Self {
            catalogs: HashMap::new(),
        }
    }
}

#[async_trait]
impl KnowledgeBaseRepository for StaticKnowledge {
    async fn load(&self, lang: &str) -> Result<Arc<KnowledgeBase>> {
        self.catalogs
            .get(lang)
            .or_else(|| self.catalogs.get("en"))
            .cloned()
            .ok_or_else(|| AidError::configuration("default knowledge base missing"))
    }
}

#[derive(Default)]
struct RecordingTranslator {
    calls: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Translator for RecordingTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));
        Ok(format!("<{target}>{text}"))
    }
}

#[derive(Default)]
struct RecordingCompleter {
    prompts: Mutex<Vec<String>>,
    fail: bool,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl Completer for RecordingCompleter {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(AidError::external("completion", "quota exceeded"));
        }
        Ok("Drink water and rest.".to_string())
    }
}

struct Harness {
    usecase: ChatUseCase,
    translator: Arc<RecordingTranslator>,
    completer: Arc<RecordingCompleter>,
}

fn harness_with(knowledge: StaticKnowledge, completer: RecordingCompleter) -> Harness {
    let translator = Arc::new(RecordingTranslator::default());
    let completer = Arc::new(completer);
    let fallback = FallbackBridge::new(
        translator.clone(),
        completer.clone(),
        &CompletionConfig::default(),
        Messages::default(),
    );
    let usecase = ChatUseCase::new(
        Arc::new(knowledge),
        Arc::new(MemorySessionStore::new(100, None)),
        fallback,
        Messages::default(),
    );
    Harness {
        usecase,
        translator,
        completer,
    }
}

fn harness() -> Harness {
    harness_with(StaticKnowledge::english(CATALOG), RecordingCompleter::default())
}

fn en(key: MessageKey) -> String {
    Messages::default().text("en", key).to_string()
}

impl Harness {
    async fn send(&self, request: ChatRequest) -> ChatResponse {
        self.usecase.handle_message(request).await
    }

    async fn say(&self, session_id: &str, message: &str) -> ChatResponse {
        self.send(ChatRequest::new(message).with_session(session_id)).await
    }

    async fn next(&self, session_id: &str) -> ChatResponse {
        self.send(ChatRequest::next(session_id)).await
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_session_id_is_stable_across_turns() {
    let h = harness();

    let first = h.send(ChatRequest::new("I twisted my sprain")).await;
    assert!(!first.session_id.is_empty());
    assert_eq!(h.usecase.sessions().len().await, 1);

    let second = h.next(&first.session_id).await;
    assert_eq!(second.session_id, first.session_id);
    assert_eq!(h.usecase.sessions().len().await, 1);
}

#[tokio::test]
async fn test_unknown_session_id_mints_exactly_one_session() {
    let h = harness();

    let response = h.say("no-such-session", "sprain").await;
    assert_ne!(response.session_id, "no-such-session");
    assert_eq!(h.usecase.sessions().len().await, 1);

    let again = h.next(&response.session_id).await;
    assert_eq!(again.session_id, response.session_id);
    assert_eq!(h.usecase.sessions().len().await, 1);
}

#[tokio::test]
async fn test_language_follows_latest_message() {
    let h = harness();
    let first = h.send(ChatRequest::new("sprain")).await;

    h.send(ChatRequest::next(&first.session_id).with_lang("ti"))
        .await;

    let handle = h.usecase.sessions().get(&first.session_id).await.unwrap();
    assert_eq!(handle.lock().await.lang, "ti");
}

#[tokio::test]
async fn test_empty_language_uses_default() {
    let h = harness();
    let response = h.send(ChatRequest::new("sprain").with_lang("  ")).await;

    let handle = h.usecase.sessions().get(&response.session_id).await.unwrap();
    assert_eq!(handle.lock().await.lang, "en");
}

// ============================================================================
// Steps
// ============================================================================

#[tokio::test]
async fn test_step_progression_and_closing_message() {
    let h = harness();

    let start = h.send(ChatRequest::new("My SPRAIN hurts")).await;
    assert_eq!(start.text, "A");
    assert!(start.has_next);
    assert!(!start.awaiting);
    assert_eq!(start.done, None);
    let id = start.session_id;

    let b = h.next(&id).await;
    assert_eq!((b.text.as_str(), b.has_next, b.done), ("B", true, Some(false)));

    let c = h.next(&id).await;
    assert_eq!((c.text.as_str(), c.has_next, c.done), ("C", false, Some(false)));

    let done = h.next(&id).await;
    assert_eq!(done.text, en(MessageKey::Done));
    assert_eq!(done.done, Some(true));
    assert!(!done.has_next);

    // Idempotent once exhausted.
    let again = h.next(&id).await;
    assert_eq!(again, done);
    let handle = h.usecase.sessions().get(&id).await.unwrap();
    assert_eq!(handle.lock().await.current_step, Some(2));
}

#[tokio::test]
async fn test_escalation_closes_sequence() {
    let h = harness();
    let start = h.send(ChatRequest::new("there is blood")).await;
    let id = start.session_id;

    h.next(&id).await;
    h.next(&id).await;
    let done = h.next(&id).await;

    assert_eq!(done.text, "Call emergency services if the bleeding does not stop.");
    assert_eq!(done.done, Some(true));
}

#[tokio::test]
async fn test_next_without_intent_returns_closing_message() {
    let h = harness();
    let session = h.usecase.sessions().create("en").await;
    let id = session.lock().await.id.clone();

    let response = h.next(&id).await;
    assert_eq!(response.text, en(MessageKey::Done));
    assert_eq!(response.done, Some(true));
}

// ============================================================================
// Follow-ups
// ============================================================================

#[tokio::test]
async fn test_followup_question_accompanies_first_step() {
    let h = harness();
    let response = h.send(ChatRequest::new("I am bleeding")).await;

    assert_eq!(response.text, "Apply firm pressure.");
    assert!(response.awaiting);
    assert_eq!(
        response.followup_question.as_deref(),
        Some("Is the bleeding heavy?")
    );
    assert!(response.has_next);
}

#[tokio::test]
async fn test_positive_answer_starts_yes_branch() {
    let h = harness();
    let id = h.send(ChatRequest::new("bleeding")).await.session_id;

    let response = h.say(&id, "Yes!").await;
    assert_eq!(response.text, "Call emergency services.");
    assert!(!response.awaiting);
    assert!(response.has_next);
}

#[tokio::test]
async fn test_negative_answer_starts_no_branch() {
    let h = harness();
    let id = h.send(ChatRequest::new("bleeding")).await.session_id;

    let response = h.say(&id, "no").await;
    assert_eq!(response.text, "Clean the cut.");
}

#[tokio::test]
async fn test_severity_term_counts_as_yes() {
    let h = harness();
    let id = h.send(ChatRequest::new("bleeding")).await.session_id;

    let response = h.say(&id, "it is really heavy").await;
    assert_eq!(response.text, "Call emergency services.");
}

#[tokio::test]
async fn test_tigrinya_answer_uses_tigrinya_lexicon() {
    let h = harness();
    let id = h.send(ChatRequest::new("bleeding")).await.session_id;

    let response = h
        .send(ChatRequest::new("እወ።").with_session(&id).with_lang("ti"))
        .await;
    assert_eq!(response.text, "Call emergency services.");
}

#[tokio::test]
async fn test_answer_without_branch_advances_current_sequence() {
    let h = harness();
    let start = h.send(ChatRequest::new("I have a fever")).await;
    assert!(start.awaiting);

    let response = h.say(&start.session_id, "no").await;
    assert_eq!(response.text, en(MessageKey::Done));
    assert_eq!(response.done, Some(true));
    assert!(!response.awaiting);

    // The follow-up is resolved: the next message is matched again.
    let next = h.say(&start.session_id, "sprain").await;
    assert_eq!(next.text, "A");
}

#[tokio::test]
async fn test_followup_stays_pending_across_next() {
    let h = harness();
    let id = h.send(ChatRequest::new("bleeding")).await.session_id;

    let step = h.next(&id).await;
    assert_eq!(step.text, "Raise the limb.");
    assert!(!step.awaiting);

    let response = h.say(&id, "yes").await;
    assert_eq!(response.text, "Call emergency services.");
}

#[tokio::test]
async fn test_branch_to_missing_intent_reports_unknown() {
    let h = harness();
    let id = h.send(ChatRequest::new("wound")).await.session_id;

    let response = h.say(&id, "yes").await;
    assert_eq!(response.text, en(MessageKey::UnknownIntent));
    assert!(!response.awaiting);
    assert!(!response.has_next);

    let handle = h.usecase.sessions().get(&id).await.unwrap();
    let session = handle.lock().await;
    assert_eq!(session.intent.as_deref(), Some("wound"));
    assert!(session.awaiting_followup());
}

// ============================================================================
// Fallback
// ============================================================================

#[tokio::test]
async fn test_unmatched_english_input_goes_straight_to_completion() {
    let h = harness_with(
        StaticKnowledge::english(BURN_CATALOG),
        RecordingCompleter::default(),
    );

    let response = h.send(ChatRequest::new("what time is it")).await;

    assert_eq!(response.text, "Drink water and rest.");
    assert!(!response.awaiting);
    assert!(!response.has_next);
    assert_eq!(response.done, None);
    assert_eq!(
        *h.completer.prompts.lock().unwrap(),
        vec!["what time is it".to_string()]
    );
    assert!(h.translator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unmatched_tigrinya_input_is_translated_both_ways() {
    let h = harness();
    let input = "ርእሰይ የሕመኒ ኣሎ";

    let response = h.send(ChatRequest::new(input).with_lang("ti")).await;

    assert_eq!(response.text, "<ti>Drink water and rest.");
    assert_eq!(
        *h.translator.calls.lock().unwrap(),
        vec![
            (input.to_string(), "ti".to_string(), "en".to_string()),
            (
                "Drink water and rest.".to_string(),
                "en".to_string(),
                "ti".to_string()
            ),
        ]
    );
    assert_eq!(*h.completer.prompts.lock().unwrap(), vec![format!("<en>{input}")]);
}

#[tokio::test]
async fn test_completion_failure_keeps_conversation_alive() {
    let h = harness_with(
        StaticKnowledge::english(BURN_CATALOG),
        RecordingCompleter {
            fail: true,
            ..Default::default()
        },
    );

    let response = h.send(ChatRequest::new("what time is it")).await;
    assert_eq!(response.text, en(MessageKey::ServiceUnavailable));

    // The session survives and keeps working.
    let burn = h.say(&response.session_id, "burn").await;
    assert_eq!(burn.text, "Cool the burn.");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_default_catalog_yields_server_error_reply() {
    let h = harness_with(StaticKnowledge::empty(), RecordingCompleter::default());

    let response = h.send(ChatRequest::new("bleeding")).await;
    assert_eq!(response.text, en(MessageKey::ServerError));
    assert!(!response.session_id.is_empty());
    assert_eq!(h.usecase.sessions().len().await, 1);
}

#[tokio::test]
async fn test_empty_message_yields_server_error_reply() {
    let h = harness();
    let response = h.send(ChatRequest::new("   ")).await;

    assert_eq!(response.text, en(MessageKey::ServerError));
    assert!(h.completer.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_request_gets_new_session() {
    let h = harness();
    let response = h.usecase.malformed_request("expected value at line 1").await;

    assert_eq!(response.text, en(MessageKey::ServerError));
    assert!(h.usecase.sessions().get(&response.session_id).await.is_some());
}

// ============================================================================
// Concurrency
// ============================================================================

fn slow_harness() -> Harness {
    harness_with(
        StaticKnowledge::english(BURN_CATALOG),
        RecordingCompleter {
            delay: Some(Duration::from_millis(20)),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn test_same_session_turns_are_serialized() {
    let h = slow_harness();
    let handle = h.usecase.sessions().create("en").await;
    let id = handle.lock().await.id.clone();

    let (a, b) = tokio::join!(
        h.say(&id, "what time is it"),
        h.say(&id, "what time is it")
    );

    assert_eq!(a.session_id, id);
    assert_eq!(b.session_id, id);
    assert_eq!(h.completer.prompts.lock().unwrap().len(), 2);
    assert_eq!(h.completer.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_different_sessions_run_concurrently() {
    let h = slow_harness();

    let (a, b) = tokio::join!(
        h.send(ChatRequest::new("what time is it")),
        h.send(ChatRequest::new("what time is it"))
    );

    assert_ne!(a.session_id, b.session_id);
    assert_eq!(h.completer.max_in_flight.load(Ordering::SeqCst), 2);
}
