//! Dialogue module: state transitions, replies and the chat exchange types.

mod controller;
mod reply;

pub use controller::{DialogueController, Route, route};
pub use reply::{Action, ChatRequest, ChatResponse, Reply};
