//! HTTP surface under `/api/v1`.

use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{auth, config::Config, main_lib::AppState, models};

mod events;
mod health;
mod images;
mod recipes;
mod search;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        auth::sign_up,
        auth::sign_in,
        auth::auth_status,
        auth::sign_out,
        recipes::list_recipes,
        recipes::search_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::set_favorite,
        recipes::toggle_favorite,
        images::upload_image,
        search::open_session,
        search::get_view,
        search::update_query,
        search::refresh,
        search::toggle_favorite,
        search::close_session,
    ),
    components(schemas(
        models::Recipe,
        models::NewRecipe,
        models::RecipeUpdate,
        models::FavoriteBody,
        models::FavoriteToggled,
        models::FavoriteTriggered,
        models::QueryBody,
        models::Query,
        models::SessionView,
        models::SessionOpened,
        models::UploadResponse,
        auth::CredentialsBody,
        auth::TokenResponse,
        auth::UserResponse,
        auth::AuthStatusResponse,
    )),
    tags((name = "recipesaver"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let openapi = ApiDoc::openapi();

    let protected = Router::new()
        .route("/auth/sign-out", post(auth::sign_out))
        .merge(recipes::router())
        .merge(search::router())
        .merge(images::router(config.max_upload_bytes))
        .merge(events::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_jwt,
        ));

    let api = Router::new()
        .merge(health::router())
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/status", get(auth::auth_status))
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .nest_service("/images", ServeDir::new(&config.upload_dir))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
