//! HTTP surface: the two grade routes, health, and the launch middleware.

pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use state::AppState;
