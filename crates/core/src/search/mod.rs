//! Search module - query state, filter predicate, and live search sessions.

mod generation;
mod search_model;
mod session;


pub use generation::GenerationTracker;
pub use search_model::{
    newest_first, sort_newest_first, CategoryFilter, RecipeFilter, SearchQuery, SearchQueryPatch,
};
pub use session::{FavoriteTrigger, SearchSessionHandle, SearchView, SessionSettings};
