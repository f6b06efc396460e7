use bcrypt::{hash, verify};
use tracing::{info, warn};

use super::Repository;
use crate::auth::AccessIdentity;
use crate::errors::{RepoError, RepoResult};
use crate::models::{User, UserId};

impl Repository {
    pub fn create_user(&self, email: &str, password: &str) -> RepoResult<User> {
        let hashed_password = hash(password, self.hash_cost)?;

        let user = self.store.transact(|doc| {
            if doc.user_by_email(email).is_some() {
                return Err(RepoError::EmailTaken);
            }

            let user = User {
                id: doc.next_user_id(),
                email: email.to_string(),
                hashed_password,
                is_promoted: false,
            };
            doc.users.insert(user.id, user.clone());
            Ok(user)
        })?;

        info!("New user registered: {} (id {})", user.email, user.id);
        Ok(user)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> RepoResult<User> {
        let doc = self.store.load()?;
        let user = doc.user_by_email(email).ok_or(RepoError::NotRegistered)?;

        if !verify(password, &user.hashed_password)? {
            warn!("Failed login for user {}", user.id);
            return Err(RepoError::InvalidCredential);
        }

        info!("User logged in: {}", user.email);
        Ok(user.clone())
    }

    /// Replace email and password of the token's user. The promotion flag is kept.
    pub fn update_user(&self, identity: AccessIdentity, email: &str, password: &str) -> RepoResult<User> {
        let user_id = identity.user_id();
        let hashed_password = hash(password, self.hash_cost)?;

        let user = self.store.transact(|doc| {
            if doc.user_by_email(email).is_some_and(|other| other.id != user_id) {
                return Err(RepoError::EmailTaken);
            }

            let user = doc
                .users
                .get_mut(&user_id)
                .ok_or_else(|| RepoError::NotFound(format!("user {}", user_id)))?;
            user.email = email.to_string();
            user.hashed_password = hashed_password;
            Ok::<_, RepoError>(user.clone())
        })?;

        info!("User {} updated", user.id);
        Ok(user)
    }

    /// Mark a user as upgraded. Returns `false` when no such user exists.
    pub fn apply_promotion(&self, user_id: UserId) -> RepoResult<bool> {
        let found = self.store.transact(|doc| {
            Ok::<_, RepoError>(match doc.users.get_mut(&user_id) {
                Some(user) => {
                    user.is_promoted = true;
                    true
                }
                None => false,
            })
        })?;

        if found {
            info!("User {} promoted", user_id);
        } else {
            warn!("Promotion for unknown user {}", user_id);
        }
        Ok(found)
    }
}
