use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use super::run_blocking;
use crate::{AppState, auth::bearer_token, dto::TokenResponse, errors::ApiError};

/// POST /api/refresh
/// Headers: Authorization: Bearer <refresh token>
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<TokenResponse>, ApiError> {
    let refresh_token = bearer_token(&headers)?.to_string();
    let repo = state.repo;

    let token = run_blocking(move || repo.refresh_access(&refresh_token)).await?;

    Ok(Json(TokenResponse { token }))
}

/// POST /api/revoke
/// Headers: Authorization: Bearer <refresh token>
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    let refresh_token = bearer_token(&headers)?.to_string();
    let repo = state.repo;

    run_blocking(move || repo.revoke_token(&refresh_token)).await?;

    Ok(StatusCode::OK)
}
