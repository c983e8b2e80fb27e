//! Relay DNS HTTP API
//!
//! Debug/introspection and reload endpoints. Read-only snapshots; never on
//! the resolution path.

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_api_routes;
pub use state::AppState;
