use std::io;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::TokenError;
use crate::models::{PostId, UserId};

pub type StoreResult<T> = Result<T, StoreError>;
pub type RepoResult<T> = Result<T, RepoError>;

/// Failures of the document store. Fatal to the triggering operation, never to the process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt document: {0}")]
    CorruptDocument(#[source] serde_json::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Outcome kinds of the repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("user not registered")]
    NotRegistered,

    #[error("password does not match")]
    InvalidCredential,

    #[error("not authorized")]
    Unauthorized,

    #[error("not allowed to modify post {0}")]
    Forbidden(PostId),

    #[error("chirp is too long: {len} characters, at most {max} allowed")]
    TooLong { len: usize, max: usize },

    #[error("invalid author id: {0:?}")]
    InvalidAuthorId(String),

    #[error("no chirps by author {0}")]
    NoPostsByAuthor(UserId),

    #[error("email already registered")]
    EmailTaken,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    UserAlreadyExists,
    Unauthorized,
    Forbidden,
    NotFound(String),
    ValidationError(String),
    InternalError(String),
}

/// Convert our custom errors to HTTP responses
///
/// Internal failures are logged and the client only sees a generic message.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            ApiError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists".to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Issue(e) => ApiError::InternalError(format!("Token creation failed: {}", e)),
            other => {
                warn!("Rejected token: {}", other);
                ApiError::Unauthorized
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Store(e) => ApiError::InternalError(e.to_string()),
            RepoError::Hash(e) => ApiError::InternalError(e.to_string()),
            RepoError::Token(e) => e.into(),
            RepoError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            RepoError::NotRegistered => ApiError::NotFound("User not registered".into()),
            RepoError::InvalidCredential => ApiError::InvalidCredentials,
            RepoError::Unauthorized => ApiError::Unauthorized,
            RepoError::Forbidden(_) => ApiError::Forbidden,
            e @ RepoError::TooLong { .. } => ApiError::ValidationError(e.to_string()),
            e @ RepoError::InvalidAuthorId(_) => ApiError::ValidationError(e.to_string()),
            e @ RepoError::NoPostsByAuthor(_) => ApiError::NotFound(e.to_string()),
            RepoError::EmailTaken => ApiError::UserAlreadyExists,
        }
    }
}
