//! Comment repository.

use super::types::{Comment, NewComment};
use crate::db::DbPool;
use crate::{BlogError, Result};

/// Repository for comment queries.
pub struct CommentRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a new comment. Comments are active as soon as they are created.
    pub async fn create(&self, new_comment: &NewComment) -> Result<Comment> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO comments (post_id, name, email, body, active)
             VALUES ($1, $2, $3, $4, 1) RETURNING id",
        )
        .bind(new_comment.post_id)
        .bind(&new_comment.name)
        .bind(&new_comment.email)
        .bind(&new_comment.body)
        .fetch_one(self.pool)
        .await
        .map_err(|e| BlogError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BlogError::NotFound("comment".to_string()))
    }

    /// Get a comment by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        sqlx::query_as(
            "SELECT id, post_id, name, email, body, created_at, updated_at, active
             FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BlogError::Database(e.to_string()))
    }

    /// Active comments on a post, oldest first.
    pub async fn list_active_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        sqlx::query_as(
            "SELECT id, post_id, name, email, body, created_at, updated_at, active
             FROM comments
             WHERE post_id = $1 AND active = 1
             ORDER BY created_at, id",
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BlogError::Database(e.to_string()))
    }

    /// Count all comments on a post, active or not.
    pub async fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;
        Ok(count)
    }
}
