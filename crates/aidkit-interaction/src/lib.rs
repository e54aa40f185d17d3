//! Clients for the hosted services behind the generative fallback.
//!
//! - [`OpenAICompletionAgent`]: chat completions, implements `Completer`
//! - [`GoogleTranslateAgent`]: machine translation, implements `Translator`

pub mod google_translate_agent;
pub mod openai_api_agent;

pub use google_translate_agent::GoogleTranslateAgent;
pub use openai_api_agent::OpenAICompletionAgent;
