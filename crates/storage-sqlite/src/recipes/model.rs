//! Database models for recipes.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use recipesaver_core::errors::{Error, Result};
use recipesaver_core::recipes::{Category, Recipe, RecipeDraft, RecipeUpdate};

/// Database model for recipes
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeDB {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    /// JSON array of strings.
    pub ingredients: String,
    pub instructions: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new recipe
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeDB {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update; `None` fields are left out of the UPDATE statement.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChangesetDB {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub category: Option<String>,
    /// `Some(None)` writes NULL.
    pub image_url: Option<Option<String>>,
    pub is_favorite: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

impl NewRecipeDB {
    pub fn from_draft(
        id: String,
        owner_id: String,
        draft: RecipeDraft,
        now: NaiveDateTime,
    ) -> Result<Self> {
        Ok(Self {
            id,
            owner_id,
            title: draft.title,
            description: draft.description,
            ingredients: encode_ingredients(&draft.ingredients)?,
            instructions: draft.instructions,
            prep_time: to_column(draft.prep_time),
            cook_time: to_column(draft.cook_time),
            servings: to_column(draft.servings),
            category: draft.category.map(|c| c.as_str().to_string()),
            image_url: draft.image_url,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        })
    }
}

impl RecipeChangesetDB {
    pub fn from_update(update: &RecipeUpdate, now: NaiveDateTime) -> Result<Self> {
        Ok(Self {
            title: update.title.clone(),
            description: update.description.clone(),
            ingredients: update
                .ingredients
                .as_deref()
                .map(encode_ingredients)
                .transpose()?,
            instructions: update.instructions.clone(),
            prep_time: update.prep_time.map(to_column),
            cook_time: update.cook_time.map(to_column),
            servings: update.servings.map(to_column),
            category: update.category.map(|c| c.as_str().to_string()),
            image_url: update.image_url_change(),
            is_favorite: update.is_favorite,
            updated_at: Some(now),
        })
    }
}

impl TryFrom<RecipeDB> for Recipe {
    type Error = Error;

    fn try_from(db: RecipeDB) -> Result<Self> {
        let ingredients: Vec<String> =
            serde_json::from_str(&db.ingredients).map_err(StorageError::from)?;
        let category = db
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?;
        Ok(Recipe {
            id: db.id,
            owner_id: db.owner_id,
            title: db.title,
            description: db.description,
            ingredients,
            instructions: db.instructions,
            prep_time: from_column(db.prep_time),
            cook_time: from_column(db.cook_time),
            servings: from_column(db.servings),
            category,
            image_url: db.image_url,
            is_favorite: db.is_favorite,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

fn encode_ingredients(ingredients: &[String]) -> Result<String> {
    Ok(serde_json::to_string(ingredients).map_err(StorageError::from)?)
}

fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn from_column(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
