//! Recipe domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SERVINGS;
use crate::errors::ValidationError;
use crate::{Error, Result};

/// Fixed set of recipe categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Dessert,
        Category::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Dessert => "Dessert",
            Category::Snack => "Snack",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::Validation(ValidationError::UnknownCategory(trimmed.to_string())))
    }
}

/// Domain model representing a stored recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub category: Option<Category>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Recipe {
    /// Preparation plus cooking time, in minutes.
    pub fn total_time(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }

    /// Instruction text split into non-blank paragraphs.
    pub fn instruction_paragraphs(&self) -> Vec<&str> {
        self.instructions
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    pub fn has_photo(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Input model for creating a new recipe, as submitted by the create form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewRecipe {
    /// Validates the new recipe data.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        Ok(())
    }

    /// Validates and applies the storage defaults, producing the record the store inserts.
    pub fn into_draft(self) -> Result<RecipeDraft> {
        self.validate()?;
        Ok(RecipeDraft {
            title: self.title,
            description: self.description.unwrap_or_default(),
            ingredients: clean_ingredients(self.ingredients),
            instructions: self.instructions.unwrap_or_default(),
            prep_time: self.prep_time.unwrap_or(0),
            cook_time: self.cook_time.unwrap_or(0),
            servings: normalize_servings(self.servings),
            category: self.category,
            image_url: normalize_image_url(self.image_url),
        })
    }
}

/// A validated recipe without identifier or timestamps; those are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub category: Option<Category>,
    pub image_url: Option<String>,
}

/// Partial update of a recipe. `None` leaves the stored field untouched.
///
/// An empty `image_url` removes the photo.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

impl RecipeUpdate {
    /// An update that only flips the favorite flag.
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == RecipeUpdate::default()
    }

    /// Validates the update and applies the same normalization as creation.
    pub fn normalize(self) -> Result<RecipeUpdate> {
        if self.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Update contains no fields".to_string(),
            )));
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "title".to_string(),
                )));
            }
        }
        Ok(RecipeUpdate {
            ingredients: self.ingredients.map(clean_ingredients),
            servings: self.servings.map(|s| normalize_servings(Some(s))),
            ..self
        })
    }

    /// The stored value for `image_url`: `Some(None)` clears the photo.
    pub fn image_url_change(&self) -> Option<Option<String>> {
        self.image_url
            .as_ref()
            .map(|url| normalize_image_url(Some(url.clone())))
    }
}

/// Drops blank and whitespace-only entries; the rest keep their text and order.
pub fn clean_ingredients(ingredients: Vec<String>) -> Vec<String> {
    ingredients
        .into_iter()
        .filter(|i| !i.trim().is_empty())
        .collect()
}

// A missing or zero servings count falls back to one.
fn normalize_servings(servings: Option<u32>) -> u32 {
    servings.filter(|s| *s > 0).unwrap_or(DEFAULT_SERVINGS)
}

fn normalize_image_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}
