use serde::{Deserialize, Serialize};

use super::UserId;

pub type PostId = u64;

/// A chirp. Stored and returned as-is, so this is also the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub body: String,
    pub author_id: UserId,
}
