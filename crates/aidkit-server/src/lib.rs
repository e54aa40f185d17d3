//! HTTP boundary for aidkit.
//!
//! - `cli`: command line flags
//! - `bootstrap`: configuration loading and component wiring
//! - `logging`: tracing subscriber setup
//! - `routes`: the axum router (`POST /chat`, `GET /health`)

pub mod bootstrap;
pub mod cli;
pub mod logging;
pub mod routes;

pub use bootstrap::AppState;
pub use routes::router;
