//! Read-modify-write operations over the document store.
//!
//! Every mutation is a single [`Store::transact`] call: load, validate, compute the
//! new document, commit. Errors return before the commit, so a failed operation never
//! changes the file. Slow work (bcrypt, token signing) happens outside the lock.

mod filter;
mod posts;
mod tokens;
mod users;

use std::sync::Arc;

use tracing::warn;

use crate::auth::TokenService;
use crate::db::Store;
use crate::errors::{RepoError, RepoResult};
use crate::models::User;

pub use filter::{MAX_CHIRP_LEN, PostFilter, SortOrder, censor};

pub const DEFAULT_HASH_COST: u32 = 10;

/// Shared handle to the store and the token service. Cheap to clone.
#[derive(Clone)]
pub struct Repository {
    store: Arc<Store>,
    tokens: Arc<TokenService>,
    hash_cost: u32,
}

impl Repository {
    pub fn new(store: Store, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Resolve an access token to the user acting with it.
    pub fn authorize(&self, token: &str) -> RepoResult<User> {
        let identity = self.tokens.authorize_access(token)?;
        let doc = self.store.load()?;

        doc.users.get(&identity.user_id()).cloned().ok_or_else(|| {
            warn!("Token for unknown user {}", identity.user_id());
            RepoError::Unauthorized
        })
    }
}
