use serde::Deserialize;
use validator::Validate;

use crate::models::UserId;

/// Body of `POST /api/users` and `PUT /api/users`.
#[derive(Debug, Validate, Deserialize)]
pub struct UserCredentialsRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

/// Query string of `GET /api/chirps`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsParams {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    pub user_id: UserId,
}
