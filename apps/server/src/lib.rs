pub mod api;
pub mod auth;
pub mod blobs;
pub mod config;
pub mod domain_events;
pub mod error;
pub mod events;
pub mod favorites;
pub mod models;
pub mod scheduler;
pub mod search_sessions;
mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
