//! Domain layer for aidkit.
//!
//! Knowledge bases, intent matching, follow-up interpretation, session state
//! and the dialogue transitions that drive a first-aid conversation, plus the
//! contracts of the services used when no offline instructions match.

pub mod config;
pub mod dialogue;
pub mod error;
pub mod fallback;
pub mod followup;
pub mod knowledge;
pub mod matcher;
pub mod messages;
pub mod session;

// Re-export common error type
pub use error::{AidError, Result};
