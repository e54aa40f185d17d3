//! Session domain module.
//!
//! - `model`: per-conversation state (`Session`, `DialogueState`)
//! - `store`: trait for the process-wide session table (`SessionStore`)

mod model;
mod store;

pub use model::{DialogueState, Session};
pub use store::{SessionHandle, SessionStore};
