use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

use super::run_blocking;
use crate::{
    AppState,
    auth::bearer_token,
    dto::{CreatePostRequest, ListPostsParams},
    errors::ApiError,
    models::{Post, PostId},
    repository::{PostFilter, SortOrder},
};

/// POST /api/chirps
/// Headers: Authorization: Bearer <access token>
/// Body: { "body": "..." }
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let token = bearer_token(&headers)?.to_string();
    let repo = state.repo;

    let post = run_blocking(move || {
        let author = repo.authorize(&token)?;
        repo.create_post(&author, &payload.body)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/chirps?author_id=1&sort=desc
pub async fn get_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsParams>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let mut filters = Vec::new();
    if let Some(author_id) = params.author_id.filter(|id| !id.is_empty()) {
        filters.push(PostFilter::AuthorId(author_id));
    }
    if let Some(sort) = params.sort.filter(|sort| !sort.is_empty()) {
        let order: SortOrder = sort.parse().map_err(ApiError::ValidationError)?;
        filters.push(PostFilter::Sort(order));
    }

    let repo = state.repo;
    let posts = run_blocking(move || repo.list_posts(&filters)).await?;

    Ok(Json(posts))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_chirp_id(&chirp_id)?;
    let repo = state.repo;

    Ok(Json(run_blocking(move || repo.get_post(id)).await?))
}

/// DELETE /api/chirps/{chirp_id}
/// Headers: Authorization: Bearer <access token>
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?.to_string();
    let id = parse_chirp_id(&chirp_id)?;
    let repo = state.repo;

    run_blocking(move || {
        let requester = repo.authorize(&token)?;
        repo.delete_post(id, &requester)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

// A chirp id that is not a number cannot exist, so it is reported like a missing one.
fn parse_chirp_id(raw: &str) -> Result<PostId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("chirp {:?} not found", raw)))
}
