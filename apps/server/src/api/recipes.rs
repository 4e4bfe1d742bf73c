use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use recipesaver_core::users::Identity;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{FavoriteBody, FavoriteToggled, NewRecipe, Recipe, RecipeUpdate, SearchParams},
};

#[utoipa::path(get, path = "/api/v1/recipes", responses((status = 200, body = [Recipe])))]
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let recipes = state.recipe_service.list_recipes(&identity).await?;
    Ok(Json(recipes.into_iter().map(Recipe::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/search",
    params(
        ("q" = Option<String>, Query, description = "Substring of title or description"),
        ("category" = Option<String>, Query, description = "Category name or All"),
    ),
    responses((status = 200, body = [Recipe]))
)]
pub async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let query = params.into_query()?;
    let recipes = state.recipe_service.search_recipes(&identity, &query).await?;
    Ok(Json(recipes.into_iter().map(Recipe::from).collect()))
}

#[utoipa::path(post, path = "/api/v1/recipes", request_body = NewRecipe, responses((status = 200, body = Recipe)))]
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(new_recipe): Json<NewRecipe>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .create_recipe(&identity, new_recipe.try_into()?)
        .await?;
    Ok(Json(Recipe::from(recipe)))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses((status = 200, body = Recipe), (status = 404))
)]
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state.recipe_service.get_recipe(&identity, &id).await?;
    Ok(Json(Recipe::from(recipe)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeUpdate,
    responses((status = 200, body = Recipe), (status = 404))
)]
pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(update): Json<RecipeUpdate>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .update_recipe(&identity, &id, update.try_into()?)
        .await?;
    Ok(Json(Recipe::from(recipe)))
}

#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = FavoriteBody,
    responses((status = 200, body = Recipe), (status = 404))
)]
pub async fn set_favorite(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<FavoriteBody>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .set_favorite(&identity, &id, body.is_favorite)
        .await?;
    Ok(Json(Recipe::from(recipe)))
}

/// Optimistic flip of the stored flag; a second request while the first is
/// still writing is ignored.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite/toggle",
    params(("id" = String, Path, description = "Recipe id")),
    responses((status = 200, body = FavoriteToggled), (status = 404))
)]
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<FavoriteToggled>> {
    let outcome = state
        .favorite_toggles
        .toggle(&identity, &id, state.recipe_service.clone())
        .await?;
    Ok(Json(FavoriteToggled::from(outcome)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/{id}", get(get_recipe).patch(update_recipe))
        .route("/recipes/{id}/favorite", put(set_favorite))
        .route("/recipes/{id}/favorite/toggle", post(toggle_favorite))
}
