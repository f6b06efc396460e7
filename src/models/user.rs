use serde::{Deserialize, Serialize};

pub type UserId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// bcrypt hash; never leaves the crate through a response DTO.
    #[serde(rename = "password")]
    pub hashed_password: String,
    #[serde(rename = "is_chirpy_red", default)]
    pub is_promoted: bool,
}
