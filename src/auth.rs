use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserId;

pub const ACCESS_ISSUER: &str = "chirpy-access";
pub const REFRESH_ISSUER: &str = "chirpy-refresh";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("missing or malformed authorization header")]
    MissingBearer,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("unknown token issuer {0:?}")]
    UnknownIssuer(String),

    #[error("token subject {0:?} is not a user id")]
    BadSubject(String),

    #[error("refresh tokens cannot authorize requests")]
    RefreshToken,

    #[error("token creation failed: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),
}

/// The two token flavours, told apart by the `iss` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_ISSUER,
            TokenKind::Refresh => REFRESH_ISSUER,
        }
    }

    fn from_issuer(iss: &str) -> Option<Self> {
        match iss {
            ACCESS_ISSUER => Some(TokenKind::Access),
            REFRESH_ISSUER => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String, // Subject (user ID)
    pub iat: i64,
    pub exp: i64,
}

/// A token whose signature and expiry checked out. Revocation is not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    pub kind: TokenKind,
}

/// Proof that the caller presented a valid access token.
///
/// Only [`TokenService::authorize_access`] builds one, so operations that take it
/// cannot be reached with a refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessIdentity(UserId);

impl AccessIdentity {
    pub fn user_id(self) -> UserId {
        self.0
    }
}

/// Issues and checks HS256 tokens signed with one shared secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::hours(1440),
        }
    }

    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self
    }

    pub fn issue_access(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, TokenKind::Access)
    }

    pub fn issue_refresh(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, TokenKind::Refresh)
    }

    fn issue(&self, user_id: UserId, kind: TokenKind) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let now = Utc::now();

        let claims = Claims {
            iss: kind.issuer().to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Issue)
    }

    /// Check signature and expiry and return who the token is for.
    pub fn validate(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;

        let kind = TokenKind::from_issuer(&claims.iss).ok_or(TokenError::UnknownIssuer(claims.iss))?;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::BadSubject(claims.sub))?;

        Ok(VerifiedToken { user_id, kind })
    }

    pub fn authorize_access(&self, token: &str) -> Result<AccessIdentity, TokenError> {
        match self.validate(token)? {
            VerifiedToken { kind: TokenKind::Refresh, .. } => Err(TokenError::RefreshToken),
            VerifiedToken { user_id, .. } => Ok(AccessIdentity(user_id)),
        }
    }
}

/// Pull the credential out of `Authorization: <scheme> <credential>`.
///
/// The scheme is not checked; `Bearer` and `ApiKey` headers both go through here.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(TokenError::MissingBearer)?;

    auth_header
        .split_whitespace()
        .nth(1)
        .ok_or(TokenError::MissingBearer)
}
