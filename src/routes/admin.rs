use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, Response},
};

use crate::states::AppState;

/// Counts every request that reaches the `/app` file server.
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    next.run(request).await
}

/// GET /admin/metrics
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n<body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n</body>\n</html>\n",
        hits
    ))
}

/// GET /api/reset
pub async fn reset_hits(State(state): State<AppState>) -> String {
    state.hits.store(0, Ordering::Relaxed);
    "Reset hits to: 0".to_string()
}
