//! Tag repository.

use super::types::{slugify, Tag};
use crate::db::DbPool;
use crate::{BlogError, Result};

/// Repository for tag queries.
pub struct TagRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> TagRepository<'a> {
    /// Create a new TagRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get a tag by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        sqlx::query_as("SELECT id, name, slug FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))
    }

    /// Get a tag by slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        sqlx::query_as("SELECT id, name, slug FROM tags WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))
    }

    /// Get the tag with the given name, creating it if missing.
    ///
    /// The slug is derived from the name.
    pub async fn get_or_create(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BlogError::Validation("tag name is empty".to_string()));
        }
        let slug = slugify(name);

        sqlx::query("INSERT OR IGNORE INTO tags (name, slug) VALUES ($1, $2)")
            .bind(name)
            .bind(&slug)
            .execute(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        let tag: Option<Tag> =
            sqlx::query_as("SELECT id, name, slug FROM tags WHERE name = $1 OR slug = $2")
                .bind(name)
                .bind(&slug)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| BlogError::Database(e.to_string()))?;

        tag.ok_or_else(|| BlogError::NotFound("tag".to_string()))
    }

    /// Tags attached to a post, ordered by name.
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Tag>> {
        sqlx::query_as(
            "SELECT t.id, t.name, t.slug FROM tags t
             JOIN post_tags pt ON pt.tag_id = t.id
             WHERE pt.post_id = $1
             ORDER BY t.name",
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BlogError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::{NewPost, PostRepository};
    use crate::db::Database;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = TagRepository::new(db.pool());

        let first = repo.get_or_create("Web Dev").await.unwrap();
        assert_eq!(first.slug, "web-dev");

        let second = repo.get_or_create("Web Dev").await.unwrap();
        assert_eq!(first, second);

        let by_slug = repo.get_by_slug("web-dev").await.unwrap();
        assert_eq!(by_slug, Some(first.clone()));
        assert_eq!(repo.get_by_id(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_get_or_create_rejects_blank() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = TagRepository::new(db.pool());

        assert!(matches!(
            repo.get_or_create("   ").await,
            Err(BlogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = TagRepository::new(db.pool());

        assert!(repo.get_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_post() {
        let db = Database::open_in_memory().await.unwrap();
        let tags = TagRepository::new(db.pool());
        let posts = PostRepository::new(db.pool());

        let post = posts.create(&NewPost::new("Tagged", "x")).await.unwrap();
        let zeta = tags.get_or_create("zeta").await.unwrap();
        let alpha = tags.get_or_create("alpha").await.unwrap();
        posts.add_tag(post.id, zeta.id).await.unwrap();
        posts.add_tag(post.id, alpha.id).await.unwrap();

        let listed = tags.list_for_post(post.id).await.unwrap();
        assert_eq!(listed, vec![alpha, zeta]);
    }
}
