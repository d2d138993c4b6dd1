//! Company history document endpoints

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde_json::Value;

use super::SuccessResponse;
use crate::error::ApiError;
use crate::server::AppState;

/// Current history document; `[]` until one is saved
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "History document", body = Object),
        (status = 500, description = "Document unreadable", body = ApiError)
    ),
    tag = "history"
)]
pub async fn get_history(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.history.load().await?))
}

/// Replace the history document with the request body
#[utoipa::path(
    post,
    path = "/api/history",
    request_body(content = Object, description = "Any JSON document"),
    responses(
        (status = 200, description = "Document stored", body = SuccessResponse),
        (status = 400, description = "Body is not JSON", body = ApiError)
    ),
    tag = "history"
)]
pub async fn save_history(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(document) = payload?;
    state.history.save(&document).await?;
    Ok(Json(SuccessResponse::ok()))
}
