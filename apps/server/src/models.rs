use chrono::NaiveDateTime;
use recipesaver_core::{
    optimistic::ToggleOutcome,
    recipes::{self as core_recipes, Category},
    search::{CategoryFilter, FavoriteTrigger, SearchQuery, SearchQueryPatch, SearchView},
    Result,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    /// `instructions` split into non-blank paragraphs, as the detail page shows them.
    pub instruction_paragraphs: Vec<String>,
    pub prep_time: u32,
    pub cook_time: u32,
    pub total_time: u32,
    pub servings: u32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<core_recipes::Recipe> for Recipe {
    fn from(r: core_recipes::Recipe) -> Self {
        Self {
            total_time: r.total_time(),
            instruction_paragraphs: r
                .instruction_paragraphs()
                .into_iter()
                .map(str::to_string)
                .collect(),
            id: r.id,
            title: r.title,
            description: r.description,
            ingredients: r.ingredients,
            instructions: r.instructions,
            prep_time: r.prep_time,
            cook_time: r.cook_time,
            servings: r.servings,
            category: r.category.map(|c| c.to_string()),
            image_url: r.image_url,
            is_favorite: r.is_favorite,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Create form payload. Only `title` is required.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
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
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<NewRecipe> for core_recipes::NewRecipe {
    type Error = recipesaver_core::Error;

    fn try_from(n: NewRecipe) -> Result<Self> {
        Ok(Self {
            category: parse_category(n.category.as_deref())?,
            title: n.title,
            description: n.description,
            ingredients: n.ingredients,
            instructions: n.instructions,
            prep_time: n.prep_time,
            cook_time: n.cook_time,
            servings: n.servings,
            image_url: n.image_url,
        })
    }
}

/// Partial update. Absent fields are left unchanged; an empty `imageUrl` removes the photo.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: Option<bool>,
}

impl TryFrom<RecipeUpdate> for core_recipes::RecipeUpdate {
    type Error = recipesaver_core::Error;

    fn try_from(u: RecipeUpdate) -> Result<Self> {
        Ok(Self {
            category: parse_category(u.category.as_deref())?,
            title: u.title,
            description: u.description,
            ingredients: u.ingredients,
            instructions: u.instructions,
            prep_time: u.prep_time,
            cook_time: u.cook_time,
            servings: u.servings,
            image_url: u.image_url,
            is_favorite: u.is_favorite,
        })
    }
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>> {
    raw.map(str::parse::<Category>).transpose()
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody {
    pub is_favorite: bool,
}

/// `?q=&category=` of the one-shot search endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> Result<SearchQuery> {
        let category = parse_filter(self.category.as_deref())?;
        Ok(SearchQuery::new(self.q, category))
    }
}

/// Term and category as typed in the search bar. `category` accepts a
/// category name or `All`.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    pub term: Option<String>,
    pub category: Option<String>,
}

impl QueryBody {
    pub fn into_patch(self) -> Result<SearchQueryPatch> {
        let category = match self.category.as_deref() {
            Some(raw) => Some(raw.parse::<CategoryFilter>()?),
            None => None,
        };
        Ok(SearchQueryPatch {
            term: self.term,
            category,
        })
    }

    pub fn into_query(self) -> Result<SearchQuery> {
        self.into_patch()
            .map(|patch| patch.apply_to(&SearchQuery::default()))
    }
}

fn parse_filter(raw: Option<&str>) -> Result<CategoryFilter> {
    raw.map(str::parse::<CategoryFilter>)
        .transpose()
        .map(Option::unwrap_or_default)
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub term: String,
    pub category: String,
}

impl From<&SearchQuery> for Query {
    fn from(q: &SearchQuery) -> Self {
        Self {
            term: q.term.clone(),
            category: q.category.to_string(),
        }
    }
}

/// Snapshot of a live search session.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub query: Query,
    pub recipes: Vec<Recipe>,
    pub loading: bool,
    pub generation: u64,
    pub revision: u64,
    /// Recipes with a favorite write in flight.
    pub busy: Vec<String>,
}

impl From<SearchView> for SessionView {
    fn from(v: SearchView) -> Self {
        Self {
            query: Query::from(&v.query),
            recipes: v.recipes.into_iter().map(Recipe::from).collect(),
            loading: v.loading,
            generation: v.generation,
            revision: v.revision,
            busy: v.busy,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionOpened {
    pub id: String,
    pub view: SessionView,
}

/// Immediate answer to a session favorite toggle; the write result shows up in the view.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTriggered {
    pub applied: bool,
    pub is_favorite: Option<bool>,
}

impl From<FavoriteTrigger> for FavoriteTriggered {
    fn from(t: FavoriteTrigger) -> Self {
        match t {
            FavoriteTrigger::Applied { is_favorite } => Self {
                applied: true,
                is_favorite: Some(is_favorite),
            },
            FavoriteTrigger::Ignored => Self {
                applied: false,
                is_favorite: None,
            },
        }
    }
}

/// Result of a standalone favorite toggle.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggled {
    pub status: String,
    pub is_favorite: Option<bool>,
}

impl From<ToggleOutcome> for FavoriteToggled {
    fn from(o: ToggleOutcome) -> Self {
        let (status, is_favorite) = match o {
            ToggleOutcome::Committed { is_favorite } => ("committed", Some(is_favorite)),
            ToggleOutcome::RolledBack { is_favorite } => ("rolledBack", Some(is_favorite)),
            ToggleOutcome::Ignored => ("ignored", None),
        };
        Self {
            status: status.to_string(),
            is_favorite,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_default_to_everything() {
        let query = SearchParams::default().into_query().unwrap();
        assert_eq!(query, SearchQuery::default());
        assert!(query.to_filter().is_unconstrained());
    }

    #[test]
    fn search_params_parse_category() {
        let query = SearchParams {
            q: "choc".to_string(),
            category: Some("dessert".to_string()),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.category, CategoryFilter::Only(Category::Dessert));

        let all = SearchParams {
            q: String::new(),
            category: Some("All".to_string()),
        }
        .into_query()
        .unwrap();
        assert_eq!(all.category, CategoryFilter::All);
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let result: Result<core_recipes::NewRecipe> = NewRecipe {
            title: "Toast".to_string(),
            category: Some("Brunch".to_string()),
            ..Default::default()
        }
        .try_into();
        assert!(matches!(result, Err(recipesaver_core::Error::Validation(_))));
    }

    #[test]
    fn query_body_patches_only_given_fields() {
        let patch = QueryBody {
            term: None,
            category: Some("Snack".to_string()),
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.term, None);
        assert_eq!(patch.category, Some(CategoryFilter::Only(Category::Snack)));
    }

    #[test]
    fn recipe_exposes_instruction_paragraphs() {
        let ts = NaiveDateTime::parse_from_str("2024-03-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let recipe = Recipe::from(core_recipes::Recipe {
            id: "r1".to_string(),
            owner_id: "u1".to_string(),
            title: "Bread".to_string(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: "Knead.\n\n  \nProof.\nBake.".to_string(),
            prep_time: 20,
            cook_time: 40,
            servings: 1,
            category: None,
            image_url: None,
            is_favorite: false,
            created_at: ts,
            updated_at: ts,
        });
        assert_eq!(recipe.instruction_paragraphs, vec!["Knead.", "Proof.", "Bake."]);
        assert_eq!(recipe.total_time, 60);
    }

    #[test]
    fn favorite_trigger_shapes() {
        assert_eq!(
            FavoriteTriggered::from(FavoriteTrigger::Applied { is_favorite: true }),
            FavoriteTriggered {
                applied: true,
                is_favorite: Some(true)
            }
        );
        assert_eq!(
            FavoriteToggled::from(ToggleOutcome::RolledBack { is_favorite: false }).status,
            "rolledBack"
        );
    }
}
