mod admin;
mod chirp;
mod health;
mod token;
mod user;
mod webhook;

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::errors::{ApiError, RepoError};
use crate::states::AppState;

/// Build the full application: `/app` static files, `/api` and `/admin`.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let app_files: Router = Router::new()
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), admin::count_hits));

    let api = Router::new()
        .route("/healthz", get(health::health_check))
        .route("/reset", get(admin::reset_hits))
        .route("/users", post(user::create_user).put(user::update_user))
        .route("/login", post(user::login))
        .route("/refresh", post(token::refresh))
        .route("/revoke", post(token::revoke))
        .route("/chirps", post(chirp::create_post).get(chirp::get_posts))
        .route("/chirps/{chirp_id}", get(chirp::get_post).delete(chirp::delete_post))
        .route("/polka/webhooks", post(webhook::polka_webhook));

    let admin = Router::new().route("/metrics", get(admin::metrics));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest_service("/app", app_files)
        .nest("/api", api)
        .nest("/admin", admin)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run a repository call on the blocking pool. Store I/O and bcrypt both block.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, RepoError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("Blocking task failed: {}", e)))?
        .map_err(ApiError::from)
}
