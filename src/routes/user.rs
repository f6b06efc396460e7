use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use super::run_blocking;
use crate::{
    AppState,
    auth::bearer_token,
    dto::{LoginRequest, LoginResponse, UserCredentialsRequest, UserResponse},
    errors::ApiError,
};

/// POST /api/users
/// Body: { "email": "...", "password": "..." }
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let repo = state.repo;
    let user = run_blocking(move || repo.create_user(&payload.email, &payload.password)).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users
/// Headers: Authorization: Bearer <access token>
/// Body: { "email": "...", "password": "..." }
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UserCredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let identity = state.repo.tokens().authorize_access(bearer_token(&headers)?)?;

    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let repo = state.repo;
    let user = run_blocking(move || repo.update_user(identity, &payload.email, &payload.password)).await?;

    Ok(Json(user.into()))
}

/// POST /api/login
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let repo = state.repo.clone();
    let user = run_blocking(move || repo.authenticate(&payload.email, &payload.password)).await?;

    // Generate tokens
    let tokens = state.repo.tokens();
    let token = tokens.issue_access(user.id)?;
    let refresh_token = tokens.issue_refresh(user.id)?;

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token,
    }))
}
