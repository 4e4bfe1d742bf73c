//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// Runtime adapters forward them to clients so that any view derived from
/// the affected records can be refreshed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A recipe was inserted.
    RecipeCreated { owner_id: String, recipe_id: String },

    /// Recipe fields other than the favorite flag were changed.
    RecipeUpdated { owner_id: String, recipe_id: String },

    /// The favorite flag of a recipe was written.
    FavoriteChanged {
        owner_id: String,
        recipe_id: String,
        is_favorite: bool,
    },
}

impl DomainEvent {
    pub fn recipe_created(owner_id: impl Into<String>, recipe_id: impl Into<String>) -> Self {
        Self::RecipeCreated {
            owner_id: owner_id.into(),
            recipe_id: recipe_id.into(),
        }
    }

    pub fn recipe_updated(owner_id: impl Into<String>, recipe_id: impl Into<String>) -> Self {
        Self::RecipeUpdated {
            owner_id: owner_id.into(),
            recipe_id: recipe_id.into(),
        }
    }

    pub fn favorite_changed(
        owner_id: impl Into<String>,
        recipe_id: impl Into<String>,
        is_favorite: bool,
    ) -> Self {
        Self::FavoriteChanged {
            owner_id: owner_id.into(),
            recipe_id: recipe_id.into(),
            is_favorite,
        }
    }

    /// The user whose collection changed.
    pub fn owner_id(&self) -> &str {
        match self {
            Self::RecipeCreated { owner_id, .. }
            | Self::RecipeUpdated { owner_id, .. }
            | Self::FavoriteChanged { owner_id, .. } => owner_id,
        }
    }

    pub fn recipe_id(&self) -> &str {
        match self {
            Self::RecipeCreated { recipe_id, .. }
            | Self::RecipeUpdated { recipe_id, .. }
            | Self::FavoriteChanged { recipe_id, .. } => recipe_id,
        }
    }
}
