use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::UploadResponse,
};

/// Multipart field carrying the photo.
const FILE_FIELD: &str = "file";

/// Multipart overhead allowed on top of the configured photo size.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Stores a recipe photo and returns its public URL.
#[utoipa::path(
    post,
    path = "/api/v1/images",
    responses(
        (status = 200, body = UploadResponse),
        (status = 400, description = "No file field"),
        (status = 413, description = "Photo too large"),
        (status = 502, description = "Storage failed")
    )
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        if bytes.len() > state.max_upload_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "Photo exceeds {} bytes",
                state.max_upload_bytes
            )));
        }
        let url = state.blob_store.upload(bytes.to_vec(), &file_name).await?;
        return Ok(Json(UploadResponse { url }));
    }
    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new().route(
        "/images",
        post(upload_image).layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
        )),
    )
}
