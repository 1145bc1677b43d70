use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::models::User;
use crate::state::AppState;
use crate::utils::error::ApiError;

/// Typed per-request identity, populated once here and read by handlers
/// from request extensions.
#[derive(Clone)]
pub struct CurrentUser {
    pub id: uuid::Uuid,
    pub user: User,
}

/// Bearer-token gate: verifies the token, loads the user record, and
/// injects `CurrentUser`. Absent or malformed credentials are rejected
/// before any handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let token = header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let user_id = state.tokens.verify(token)?;

    let user = state
        .repos
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("unknown user".to_string()))?;

    request
        .extensions_mut()
        .insert(CurrentUser { id: user_id, user });

    Ok(next.run(request).await)
}
