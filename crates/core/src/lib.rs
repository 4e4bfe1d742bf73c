//! Recipe Saver Core - Domain entities, services, and traits.
//!
//! This crate contains the core logic for Recipe Saver: the recipe model and
//! its validation, the search filter, live search sessions with debounced
//! queries, and optimistic favorite toggles. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod blobs;
pub mod constants;
pub mod errors;
pub mod events;
pub mod optimistic;
pub mod recipes;
pub mod search;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
