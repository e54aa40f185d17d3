//! Infrastructure layer for aidkit.
//!
//! Filesystem-backed knowledge catalogs, the in-memory session table, and
//! loading of `config.toml` and `secret.json`.

pub mod json_knowledge_base_repository;
pub mod memory_session_store;
pub mod paths;
pub mod storage;

pub use json_knowledge_base_repository::JsonKnowledgeBaseRepository;
pub use memory_session_store::MemorySessionStore;
pub use paths::AidPaths;
