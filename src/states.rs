use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use crate::repository::Repository;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Every field is a handle, so cloning per request is cheap.
///
/// `repo` owns the document store and the token service; the store does its own
/// locking, handlers never see the document itself.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub polka_key: String,
    pub hits: Arc<AtomicUsize>, // /app requests since start or last reset
}

impl AppState {
    pub fn new(repo: Repository, polka_key: impl Into<String>) -> Self {
        Self {
            repo,
            polka_key: polka_key.into(),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }
}
