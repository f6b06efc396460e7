use std::collections::btree_map::Entry;

use chrono::Utc;
use tracing::{info, warn};

use super::Repository;
use crate::auth::TokenKind;
use crate::db::RevocationRecord;
use crate::errors::{RepoError, RepoResult};

impl Repository {
    /// Put `token` on the revocation list. Revoking twice keeps the first record.
    ///
    /// The token is not parsed, so anything the caller hands over is recorded.
    pub fn revoke_token(&self, token: &str) -> RepoResult<()> {
        let newly_revoked = self.store.transact(|doc| {
            Ok::<_, RepoError>(match doc.revoked_tokens.entry(token.to_string()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(RevocationRecord {
                        token: token.to_string(),
                        revoked_at: Utc::now(),
                    });
                    true
                }
            })
        })?;

        if newly_revoked {
            info!("Token revoked");
        }
        Ok(())
    }

    /// Trade a live, unrevoked refresh token for a new access token.
    pub fn refresh_access(&self, refresh_token: &str) -> RepoResult<String> {
        let verified = self.tokens.validate(refresh_token)?;
        if verified.kind != TokenKind::Refresh {
            warn!("Access token presented for refresh (user {})", verified.user_id);
            return Err(RepoError::Unauthorized);
        }

        let doc = self.store.load()?;
        if doc.is_revoked(refresh_token) {
            warn!("Revoked refresh token presented (user {})", verified.user_id);
            return Err(RepoError::Unauthorized);
        }
        if !doc.users.contains_key(&verified.user_id) {
            return Err(RepoError::Unauthorized);
        }

        Ok(self.tokens.issue_access(verified.user_id)?)
    }
}
