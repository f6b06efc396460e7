use tracing::{debug, info, warn};

use super::Repository;
use super::filter::{MAX_CHIRP_LEN, PostFilter, SortOrder, censor};
use crate::errors::{RepoError, RepoResult};
use crate::models::{Post, PostId, User, UserId};

impl Repository {
    /// Store a new chirp by `author`. Surrounding whitespace is dropped, and the
    /// length limit applies to what is left, before any masking.
    pub fn create_post(&self, author: &User, body: &str) -> RepoResult<Post> {
        let body = body.trim();
        let len = body.chars().count();
        if len > MAX_CHIRP_LEN {
            return Err(RepoError::TooLong { len, max: MAX_CHIRP_LEN });
        }
        let body = censor(body);

        let post = self.store.transact(|doc| {
            let post = Post {
                id: doc.next_post_id(),
                body,
                author_id: author.id,
            };
            doc.posts.insert(post.id, post.clone());
            Ok::<_, RepoError>(post)
        })?;

        info!("Chirp {} created by user {}", post.id, post.author_id);
        Ok(post)
    }

    pub fn list_posts(&self, filters: &[PostFilter]) -> RepoResult<Vec<Post>> {
        let doc = self.store.load()?;
        let mut posts: Vec<Post> = doc.posts.into_values().collect();

        for filter in filters {
            match filter {
                PostFilter::AuthorId(raw) => {
                    let author_id: UserId = raw
                        .parse()
                        .map_err(|_| RepoError::InvalidAuthorId(raw.clone()))?;
                    posts.retain(|post| post.author_id == author_id);
                    if posts.is_empty() {
                        return Err(RepoError::NoPostsByAuthor(author_id));
                    }
                }
                PostFilter::Sort(SortOrder::Asc) => posts.sort_by_key(|post| post.id),
                PostFilter::Sort(SortOrder::Desc) => posts.sort_by(|a, b| b.id.cmp(&a.id)),
            }
        }

        debug!("Listing {} chirps ({} filters)", posts.len(), filters.len());
        Ok(posts)
    }

    pub fn get_post(&self, id: PostId) -> RepoResult<Post> {
        let mut doc = self.store.load()?;
        doc.posts
            .remove(&id)
            .ok_or_else(|| RepoError::NotFound(format!("chirp {}", id)))
    }

    /// Only the author may delete a chirp.
    pub fn delete_post(&self, id: PostId, requester: &User) -> RepoResult<()> {
        self.store.transact(|doc| {
            let post = doc
                .posts
                .get(&id)
                .ok_or_else(|| RepoError::NotFound(format!("chirp {}", id)))?;

            if post.author_id != requester.id {
                warn!("User {} tried to delete chirp {} of user {}", requester.id, id, post.author_id);
                return Err(RepoError::Forbidden(id));
            }

            doc.posts.remove(&id);
            Ok::<_, RepoError>(())
        })?;

        info!("Chirp {} deleted by user {}", id, requester.id);
        Ok(())
    }
}
