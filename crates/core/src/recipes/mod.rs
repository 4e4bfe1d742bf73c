//! Recipes module - domain models, services, and traits.

mod recipes_model;
mod recipes_service;
mod recipes_traits;

#[cfg(test)]
mod recipes_model_tests;

pub use recipes_model::{
    clean_ingredients, Category, NewRecipe, Recipe, RecipeDraft, RecipeUpdate,
};
pub use recipes_service::RecipeService;
pub use recipes_traits::{RecipeRepositoryTrait, RecipeServiceTrait};
