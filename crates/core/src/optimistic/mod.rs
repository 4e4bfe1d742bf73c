//! Optimistic mutations: apply locally, write, roll back on failure.

mod cell;
mod favorite_toggle;

pub use cell::OptimisticCell;
pub use favorite_toggle::{FavoriteToggle, ToggleOutcome};
