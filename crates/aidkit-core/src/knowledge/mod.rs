//! Knowledge base domain module.
//!
//! - `model`: catalog types (`KnowledgeBase`, `Entry`, `Followup`)
//! - `repository`: trait for loading catalogs by language

mod model;
mod repository;

pub use model::{Entry, Followup, KnowledgeBase};
pub use repository::KnowledgeBaseRepository;
