//! Application layer for aidkit.
//!
//! Use cases coordinate the domain components with the session store, the
//! knowledge base repository and the fallback collaborators.

pub mod chat_usecase;

pub use chat_usecase::ChatUseCase;
