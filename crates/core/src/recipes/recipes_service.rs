use log::{debug, warn};
use std::sync::Arc;

use super::recipes_model::{NewRecipe, Recipe, RecipeUpdate};
use super::recipes_traits::{RecipeRepositoryTrait, RecipeServiceTrait};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::search::{RecipeFilter, SearchQuery};
use crate::users::Identity;

/// Service for managing a user's recipe collection.
pub struct RecipeService {
    repository: Arc<dyn RecipeRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl RecipeService {
    pub fn new(
        repository: Arc<dyn RecipeRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }
}

#[async_trait::async_trait]
impl RecipeServiceTrait for RecipeService {
    async fn create_recipe(&self, identity: &Identity, new_recipe: NewRecipe) -> Result<Recipe> {
        let draft = new_recipe.into_draft()?;
        debug!(
            "Creating recipe '{}' with {} ingredient(s) for user {}",
            draft.title,
            draft.ingredients.len(),
            identity.user_id
        );
        let recipe = self.repository.insert(&identity.user_id, draft).await?;
        self.event_sink
            .emit(DomainEvent::recipe_created(&identity.user_id, &recipe.id));
        Ok(recipe)
    }

    async fn get_recipe(&self, identity: &Identity, recipe_id: &str) -> Result<Recipe> {
        self.repository.get(&identity.user_id, recipe_id).await
    }

    async fn list_recipes(&self, identity: &Identity) -> Result<Vec<Recipe>> {
        self.repository
            .list(&identity.user_id, &RecipeFilter::all())
            .await
    }

    async fn search_recipes(
        &self,
        identity: &Identity,
        query: &SearchQuery,
    ) -> Result<Vec<Recipe>> {
        let filter = query.to_filter();
        debug!("Searching recipes of {} with {}", identity.user_id, filter);
        self.repository.list(&identity.user_id, &filter).await
    }

    async fn update_recipe(
        &self,
        identity: &Identity,
        recipe_id: &str,
        update: RecipeUpdate,
    ) -> Result<Recipe> {
        let update = update.normalize()?;
        let favorite_only = update == RecipeUpdate::favorite(update.is_favorite.unwrap_or(false));
        let recipe = self
            .repository
            .update(&identity.user_id, recipe_id, update)
            .await?;
        let event = if favorite_only {
            DomainEvent::favorite_changed(&identity.user_id, &recipe.id, recipe.is_favorite)
        } else {
            DomainEvent::recipe_updated(&identity.user_id, &recipe.id)
        };
        self.event_sink.emit(event);
        Ok(recipe)
    }

    async fn set_favorite(
        &self,
        identity: &Identity,
        recipe_id: &str,
        is_favorite: bool,
    ) -> Result<Recipe> {
        let result = self
            .repository
            .update(&identity.user_id, recipe_id, RecipeUpdate::favorite(is_favorite))
            .await;
        match result {
            Ok(recipe) => {
                self.event_sink.emit(DomainEvent::favorite_changed(
                    &identity.user_id,
                    &recipe.id,
                    recipe.is_favorite,
                ));
                Ok(recipe)
            }
            Err(e) => {
                warn!("Failed to set favorite on recipe {}: {}", recipe_id, e);
                Err(e)
            }
        }
    }
}
