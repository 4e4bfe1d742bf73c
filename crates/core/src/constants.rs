use std::time::Duration;

/// Quiet period a search query must survive before it is sent to the store.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Category filter sentinel meaning "no category constraint".
pub const ALL_CATEGORIES: &str = "All";

/// Servings assumed when the form leaves the field empty.
pub const DEFAULT_SERVINGS: u32 = 1;

/// Minimum accepted password length at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Path segment under which uploaded recipe photos are published.
pub const IMAGE_BUCKET: &str = "images";
