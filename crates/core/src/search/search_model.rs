//! Search query state and the record filter derived from it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::ALL_CATEGORIES;
use crate::recipes::{Category, Recipe};
use crate::{Error, Result};

/// Category constraint of a search. `All` places no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(*c),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    /// An empty value is treated like `All`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse::<Category>().map(CategoryFilter::Only)
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The user's current search input: free-text term plus category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub category: CategoryFilter,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            term: term.into(),
            category,
        }
    }

    /// Builds the store filter. An empty term adds no text predicate.
    pub fn to_filter(&self) -> RecipeFilter {
        RecipeFilter {
            text: (!self.term.is_empty()).then(|| self.term.clone()),
            category: self.category.category(),
        }
    }
}

/// Partial update of a search query; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryPatch {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryFilter>,
}

impl SearchQueryPatch {
    pub fn apply_to(self, query: &SearchQuery) -> SearchQuery {
        SearchQuery {
            term: self.term.unwrap_or_else(|| query.term.clone()),
            category: self.category.unwrap_or(query.category),
        }
    }
}

/// Predicate a store evaluates when listing recipes.
///
/// `text` matches case-insensitively as a substring of the title OR the
/// description; `category` requires exact equality. Both are AND-combined.
/// Ingredients are never searched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeFilter {
    pub text: Option<String>,
    pub category: Option<Category>,
}

impl RecipeFilter {
    /// The filter that selects every recipe of the owner.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.text.is_none() && self.category.is_none()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let text_ok = match &self.text {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                recipe.title.to_lowercase().contains(&needle)
                    || recipe.description.to_lowercase().contains(&needle)
            }
        };
        let category_ok = match self.category {
            None => true,
            Some(category) => recipe.category == Some(category),
        };
        text_ok && category_ok
    }

    /// Selects the matching recipes, newest first.
    pub fn apply<'a, I>(&self, recipes: I) -> Vec<Recipe>
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        let mut selected: Vec<Recipe> = recipes
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut selected);
        selected
    }
}

impl fmt::Display for RecipeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.category) {
            (None, None) => f.write_str("*"),
            (Some(text), None) => {
                write!(f, "(title ilike %{text}% OR description ilike %{text}%)")
            }
            (None, Some(category)) => write!(f, "category = {}", category),
            (Some(text), Some(category)) => write!(
                f,
                "(title ilike %{text}% OR description ilike %{text}%) AND category = {}",
                category
            ),
        }
    }
}

/// Display order for result lists: newest `created_at` first, ties by `id` ascending.
pub fn newest_first(a: &Recipe, b: &Recipe) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_newest_first(recipes: &mut [Recipe]) {
    recipes.sort_by(newest_first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn recipe(id: &str, title: &str, description: &str, category: Option<Category>, age_min: i64) -> Recipe {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let created = base - Duration::minutes(age_min);
        Recipe {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            ingredients: vec!["chocolate".to_string()],
            instructions: String::new(),
            prep_time: 0,
            cook_time: 0,
            servings: 1,
            category,
            image_url: None,
            is_favorite: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_all_and_empty_term_yield_no_predicate() {
        let filter = SearchQuery::default().to_filter();
        assert!(filter.is_unconstrained());
        assert_eq!(filter.to_string(), "*");
    }

    #[test]
    fn test_term_and_category_render_combined_predicate() {
        let query = SearchQuery::new("choc", CategoryFilter::Only(Category::Dessert));
        assert_eq!(
            query.to_filter().to_string(),
            "(title ilike %choc% OR description ilike %choc%) AND category = Dessert"
        );
    }

    #[test]
    fn test_matches_title_or_description_case_insensitively() {
        let filter = SearchQuery::new("CHOC", CategoryFilter::All).to_filter();
        assert!(filter.matches(&recipe("1", "Chocolate cake", "", None, 0)));
        assert!(filter.matches(&recipe("2", "Cake", "rich dark choc", None, 0)));
        assert!(!filter.matches(&recipe("3", "Cake", "vanilla", None, 0)));
    }

    #[test]
    fn test_ingredients_are_not_searched() {
        let filter = SearchQuery::new("chocolate", CategoryFilter::All).to_filter();
        assert!(!filter.matches(&recipe("1", "Brownies", "fudgy", None, 0)));
    }

    #[test]
    fn test_category_requires_exact_equality() {
        let filter = SearchQuery::new("", CategoryFilter::Only(Category::Lunch)).to_filter();
        assert!(filter.matches(&recipe("1", "Wrap", "", Some(Category::Lunch), 0)));
        assert!(!filter.matches(&recipe("2", "Wrap", "", Some(Category::Dinner), 0)));
        assert!(!filter.matches(&recipe("3", "Wrap", "", None, 0)));
    }

    #[test]
    fn test_apply_orders_newest_first_with_id_tiebreak() {
        let recipes = vec![
            recipe("b", "Old", "", None, 30),
            recipe("z", "New", "", None, 0),
            recipe("a", "New too", "", None, 0),
        ];
        let ids: Vec<String> = RecipeFilter::all()
            .apply(&recipes)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "z", "b"]);
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "snack".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Snack)
        );
        assert!("Supper".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_query_patch_keeps_missing_fields() {
        let query = SearchQuery::new("soup", CategoryFilter::Only(Category::Dinner));
        let patched = SearchQueryPatch {
            term: Some("stew".to_string()),
            category: None,
        }
        .apply_to(&query);
        assert_eq!(patched, SearchQuery::new("stew", CategoryFilter::Only(Category::Dinner)));
    }

    #[test]
    fn test_query_serializes_category_as_string() {
        let query = SearchQuery::new("pie", CategoryFilter::All);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["category"], "All");
        let back: SearchQuery = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);
    }
}
