use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Post, PostId, User, UserId};

/// Entry of the revocation list. Keyed by the raw token it revokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRecord {
    pub token: String,
    pub revoked_at: DateTime<Utc>,
}

/// The whole persisted state. Loaded and replaced as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "chirps", default)]
    pub posts: BTreeMap<PostId, Post>,
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(rename = "revokedTokens", default)]
    pub revoked_tokens: BTreeMap<String, RevocationRecord>,
}

impl Document {
    pub fn next_user_id(&self) -> UserId {
        next_id(&self.users)
    }

    pub fn next_post_id(&self) -> PostId {
        next_id(&self.posts)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|user| user.email == email)
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked_tokens.contains_key(token)
    }
}

// One past the highest id in use. Unlike `len() + 1` this never lands on a live
// entry after a deletion.
fn next_id<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}
