use axum::extract::State;
use serde_json::json;

use crate::state::AppState;
use crate::utils::error::ApiError;
use crate::utils::extract::Json;
use crate::utils::response::ApiResponse;

/// Liveness probe that round-trips the document store.
pub async fn ping(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.db.ping().await?;
    Ok(ApiResponse::message("pinged successfully"))
}

/// Static liveness probe.
pub async fn status_check() -> Json<ApiResponse<serde_json::Value>> {
    ApiResponse::with_data("alive", json!({ "status": "ok" }))
}
