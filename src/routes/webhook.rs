use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, warn};

use super::run_blocking;
use crate::{AppState, auth::bearer_token, dto::WebhookRequest, errors::ApiError};

const USER_UPGRADED: &str = "user.upgraded";

/// POST /api/polka/webhooks
/// Headers: Authorization: ApiKey <polka key>
/// Body: { "event": "user.upgraded", "data": { "user_id": 3 } }
///
/// Events other than `user.upgraded` are acknowledged and ignored.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookRequest>,
) -> Result<StatusCode, ApiError> {
    if bearer_token(&headers)? != state.polka_key {
        warn!("Webhook called with a wrong API key");
        return Err(ApiError::Unauthorized);
    }

    if payload.event != USER_UPGRADED {
        debug!("Ignoring webhook event {:?}", payload.event);
        return Ok(StatusCode::OK);
    }

    let user_id = payload.data.user_id;
    let repo = state.repo;
    if run_blocking(move || repo.apply_promotion(user_id)).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound(format!("user {} not found", user_id)))
    }
}
