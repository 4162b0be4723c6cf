//! Mailveil server: HTTP routes, shared state and the one-shot CLI.

pub mod cli;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
