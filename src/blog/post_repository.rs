//! Post repository.
//!
//! Every public query takes `now` (storage format) so visibility checks are
//! plain string comparisons against the `publish` column.


use super::types::{NewPost, Post, PostStatus};
use crate::datetime;
use crate::db::DbPool;
use crate::{BlogError, Result};

const POST_COLUMNS: &str =
    "p.id, p.title, p.slug, p.author, p.body, p.publish, p.created_at, p.updated_at, p.status";

const PUBLISHED: &str = "p.status = 'published' AND p.publish <= ";

/// Repository for post queries.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (title, slug, author, body, publish, status)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&new_post.title)
        .bind(&new_post.slug)
        .bind(&new_post.author)
        .bind(&new_post.body)
        .bind(&new_post.publish)
        .bind(new_post.status.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| BlogError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BlogError::NotFound("post".to_string()))
    }

    /// Attach a tag to a post. Attaching the same tag twice is a no-op.
    pub async fn add_tag(&self, post_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(tag_id)
            .execute(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a post by ID regardless of status.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1");
        let result: Option<PostRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(result.map(|row| row.into_post()))
    }

    /// Get a post by ID if it is published at `now`.
    pub async fn get_published_by_id(&self, id: i64, now: &str) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1 AND {PUBLISHED}$2");
        let result: Option<PostRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(now)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(result.map(|row| row.into_post()))
    }

    /// Get a published post by its natural key: slug plus the local calendar
    /// date of its publish timestamp.
    ///
    /// Impossible dates simply find nothing.
    pub async fn get_published_by_date_slug(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
        timezone: &str,
        now: &str,
    ) -> Result<Option<Post>> {
        let Some((start, end)) = datetime::day_bounds(year, month, day, timezone) else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             WHERE p.slug = $1 AND p.publish >= $2 AND p.publish < $3 AND {PUBLISHED}$4
             ORDER BY p.publish DESC, p.id DESC
             LIMIT 1"
        );
        let result: Option<PostRow> = sqlx::query_as(&sql)
            .bind(slug)
            .bind(start)
            .bind(end)
            .bind(now)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(result.map(|row| row.into_post()))
    }

    /// Count posts published at `now`.
    pub async fn count_published(&self, now: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM posts p WHERE {PUBLISHED}$1");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(now)
            .fetch_one(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;
        Ok(count)
    }

    /// List posts published at `now`, newest first.
    pub async fn list_published(&self, now: &str, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             WHERE {PUBLISHED}$1
             ORDER BY p.publish DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_post()).collect())
    }

    /// Count published posts carrying the given tag.
    pub async fn count_published_by_tag(&self, tag_id: i64, now: &str) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM posts p
             JOIN post_tags pt ON pt.post_id = p.id
             WHERE pt.tag_id = $1 AND {PUBLISHED}$2"
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(tag_id)
            .bind(now)
            .fetch_one(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;
        Ok(count)
    }

    /// List published posts carrying the given tag, newest first.
    pub async fn list_published_by_tag(
        &self,
        tag_id: i64,
        now: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             JOIN post_tags pt ON pt.post_id = p.id
             WHERE pt.tag_id = $1 AND {PUBLISHED}$2
             ORDER BY p.publish DESC, p.id DESC
             LIMIT $3 OFFSET $4"
        );
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(tag_id)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_post()).collect())
    }

    /// Published posts sharing at least one tag with `post_id`.
    ///
    /// Ordered by number of shared tags, then publish date (both descending),
    /// then id descending. The post itself is never included.
    pub async fn similar_posts(&self, post_id: i64, now: &str, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS}, COUNT(pt.tag_id) AS same_tags
             FROM posts p
             JOIN post_tags pt ON pt.post_id = p.id
             WHERE pt.tag_id IN (SELECT tag_id FROM post_tags WHERE post_id = $1)
               AND p.id != $1
               AND {PUBLISHED}$2
             GROUP BY p.id
             ORDER BY same_tags DESC, p.publish DESC, p.id DESC
             LIMIT $3"
        );
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(post_id)
            .bind(now)
            .bind(limit)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_post()).collect())
    }

    /// Every published post, newest first, as input to search ranking.
    ///
    /// Term matching happens in [`super::search`]. SQLite's `lower()` and
    /// `LIKE` only fold ASCII, so text is never filtered here.
    pub async fn search_candidates(&self, now: &str) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             WHERE {PUBLISHED}$1
             ORDER BY p.publish DESC, p.id DESC"
        );
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(now)
            .fetch_all(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_post()).collect())
    }
}

/// Internal row type for post queries.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    slug: String,
    author: String,
    body: String,
    publish: String,
    created_at: String,
    updated_at: String,
    status: String,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            title: self.title,
            slug: self.slug,
            author: self.author,
            body: self.body,
            publish: self.publish,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: self.status.parse().unwrap_or(PostStatus::Draft),
        }
    }
}
