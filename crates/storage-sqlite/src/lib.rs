//! SQLite storage implementation for Recipe Saver.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `recipesaver-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for recipes and users
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod recipes;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use recipes::RecipeRepository;
pub use users::UserRepository;

// Re-export from recipesaver-core for convenience
pub use recipesaver_core::errors::{DatabaseError, Error, Result};
