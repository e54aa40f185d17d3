//! Generative fallback module.
//!
//! - `collaborators`: traits for the translation and completion services
//! - `bridge`: `FallbackBridge`, which wraps them with failure substitution

mod bridge;
mod collaborators;

pub use bridge::{FallbackBridge, PIVOT_LANGUAGE};
pub use collaborators::{CompletionRequest, Completer, Translator};
