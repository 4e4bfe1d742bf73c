//! Recipe repository and service traits.
//!
//! These traits define the contract for recipe operations without any
//! database-specific types. Every call is scoped to one owner; a record of
//! another owner behaves exactly like a missing one.

use async_trait::async_trait;

use super::recipes_model::{NewRecipe, Recipe, RecipeDraft, RecipeUpdate};
use crate::errors::Result;
use crate::search::{RecipeFilter, SearchQuery};
use crate::users::Identity;

/// Trait defining the contract for the recipe record store.
#[async_trait]
pub trait RecipeRepositoryTrait: Send + Sync {
    /// Lists the owner's recipes matching `filter`, newest first (ties by id).
    async fn list(&self, owner_id: &str, filter: &RecipeFilter) -> Result<Vec<Recipe>>;

    /// Retrieves one recipe or `DatabaseError::NotFound`.
    async fn get(&self, owner_id: &str, recipe_id: &str) -> Result<Recipe>;

    /// Inserts a recipe. The store assigns the id and both timestamps.
    async fn insert(&self, owner_id: &str, draft: RecipeDraft) -> Result<Recipe>;

    /// Applies a normalized partial update and returns the stored record.
    async fn update(&self, owner_id: &str, recipe_id: &str, update: RecipeUpdate)
        -> Result<Recipe>;
}

/// Trait defining the contract for recipe service operations.
#[async_trait]
pub trait RecipeServiceTrait: Send + Sync {
    async fn create_recipe(&self, identity: &Identity, new_recipe: NewRecipe) -> Result<Recipe>;

    async fn get_recipe(&self, identity: &Identity, recipe_id: &str) -> Result<Recipe>;

    /// The whole collection, newest first.
    async fn list_recipes(&self, identity: &Identity) -> Result<Vec<Recipe>>;

    /// One filtered query for the given search state.
    async fn search_recipes(&self, identity: &Identity, query: &SearchQuery)
        -> Result<Vec<Recipe>>;

    async fn update_recipe(
        &self,
        identity: &Identity,
        recipe_id: &str,
        update: RecipeUpdate,
    ) -> Result<Recipe>;

    /// Writes only the favorite flag.
    async fn set_favorite(
        &self,
        identity: &Identity,
        recipe_id: &str,
        is_favorite: bool,
    ) -> Result<Recipe>;
}
