//! Live search sessions: debounced queries, optimistic favorites, SSE views.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post, put},
    Extension, Json, Router,
};
use futures_core::stream::Stream;
use recipesaver_core::users::Identity;
use tokio_stream::{wrappers::WatchStream, StreamExt};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{FavoriteTriggered, QueryBody, SessionOpened, SessionView},
};

const VIEW_EVENT: &str = "search:view";

/// Opens a session. The first fetch runs once the debounce window has passed.
#[utoipa::path(
    post,
    path = "/api/v1/search/sessions",
    request_body = QueryBody,
    responses((status = 200, body = SessionOpened))
)]
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<QueryBody>,
) -> ApiResult<Json<SessionOpened>> {
    let query = body.into_query()?;
    let (id, handle) = state.search_sessions.open(identity, query);
    Ok(Json(SessionOpened {
        id,
        view: SessionView::from(handle.view()),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/search/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses((status = 200, body = SessionView), (status = 404))
)]
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionView>> {
    let handle = state.search_sessions.get(&identity, &id)?;
    Ok(Json(SessionView::from(handle.view())))
}

#[utoipa::path(
    put,
    path = "/api/v1/search/sessions/{id}/query",
    params(("id" = String, Path, description = "Session id")),
    request_body = QueryBody,
    responses((status = 202), (status = 404))
)]
pub async fn update_query(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<QueryBody>,
) -> ApiResult<StatusCode> {
    let handle = state.search_sessions.get(&identity, &id)?;
    handle.update_query(body.into_patch()?).await?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/v1/search/sessions/{id}/refresh",
    params(("id" = String, Path, description = "Session id")),
    responses((status = 202), (status = 404))
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.search_sessions.get(&identity, &id)?.refresh().await?;
    Ok(StatusCode::ACCEPTED)
}

#[utoipa::path(
    post,
    path = "/api/v1/search/sessions/{id}/favorites/{recipe_id}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("recipe_id" = String, Path, description = "Displayed recipe id"),
    ),
    responses((status = 200, body = FavoriteTriggered), (status = 404))
)]
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path((id, recipe_id)): Path<(String, String)>,
) -> ApiResult<Json<FavoriteTriggered>> {
    let handle = state.search_sessions.get(&identity, &id)?;
    let trigger = handle.toggle_favorite(recipe_id).await?;
    Ok(Json(FavoriteTriggered::from(trigger)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/search/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses((status = 204), (status = 404))
)]
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.search_sessions.close(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every published view, starting with the current one. Ends when the session closes.
pub async fn stream_view(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    let (handle, lease) = state.search_sessions.watch(&identity, &id)?;
    let views = WatchStream::new(handle.subscribe());
    let stream = views.filter_map(move |view| {
        let _lease = &lease;
        match SseEvent::default()
            .event(VIEW_EVENT)
            .json_data(SessionView::from(view))
        {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::error!("Failed to serialize search view: {}", err);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search/sessions", post(open_session))
        .route("/search/sessions/{id}", get(get_view).delete(close_session))
        .route("/search/sessions/{id}/query", put(update_query))
        .route("/search/sessions/{id}/refresh", post(refresh))
        .route(
            "/search/sessions/{id}/favorites/{recipe_id}",
            post(toggle_favorite),
        )
        .route("/search/sessions/{id}/stream", get(stream_view))
}
