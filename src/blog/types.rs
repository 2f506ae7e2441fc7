//! Blog entities: posts, tags and comments.

use std::fmt;
use std::str::FromStr;

use crate::datetime;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostStatus {
    /// Work in progress, never shown publicly.
    #[default]
    Draft,
    /// Visible once its publish time has passed.
    Published,
}

impl PostStatus {
    /// Convert status to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(format!("unknown post status: {s}")),
        }
    }
}

/// Post entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// URL slug, unique per publish date.
    pub slug: String,
    /// Author display name.
    pub author: String,
    /// Post body.
    pub body: String,
    /// Publish timestamp (UTC, storage format).
    pub publish: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Publication status.
    pub status: PostStatus,
}

impl Post {
    /// Whether the post is visible to readers at `now` (storage format).
    pub fn is_published_at(&self, now: &str) -> bool {
        self.status == PostStatus::Published && self.publish.as_str() <= now
    }

    /// Canonical path of the post: `/blog/{year}/{month}/{day}/{slug}/`.
    ///
    /// The date is the publish date in `timezone`.
    pub fn absolute_path(&self, timezone: &str) -> String {
        match datetime::local_date(&self.publish, timezone) {
            Some((year, month, day)) => {
                format!("/blog/{year}/{month}/{day}/{}/", self.slug)
            }
            None => format!("/blog/{}/share/", self.id),
        }
    }
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Author display name.
    pub author: String,
    /// Post body.
    pub body: String,
    /// Publish timestamp (UTC, storage format).
    pub publish: String,
    /// Publication status.
    pub status: PostStatus,
}

impl NewPost {
    /// Create a draft post published now, with the slug derived from the title.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            author: String::new(),
            body: body.into(),
            publish: datetime::now_db_string(),
            status: PostStatus::Draft,
        }
    }

    /// Set the slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Set the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the publish timestamp (storage format).
    pub fn publish(mut self, publish: impl Into<String>) -> Self {
        self.publish = publish.into();
        self
    }

    /// Set the status.
    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as published.
    pub fn published(self) -> Self {
        self.status(PostStatus::Published)
    }
}

/// Tag entity.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

impl Tag {
    /// Path of the tag's post listing.
    pub fn absolute_path(&self) -> String {
        format!("/blog/tag/{}/", self.slug)
    }
}

/// Comment entity.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID.
    pub id: i64,
    /// ID of the post this comment belongs to.
    pub post_id: i64,
    /// Author name.
    pub name: String,
    /// Author email.
    pub email: String,
    /// Comment text.
    pub body: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Whether the comment is shown on the post page.
    pub active: bool,
}

/// Data for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// ID of the post being commented on.
    pub post_id: i64,
    /// Author name.
    pub name: String,
    /// Author email.
    pub email: String,
    /// Comment text.
    pub body: String,
}

impl NewComment {
    /// Create a new comment with required fields.
    pub fn new(
        post_id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }
}

/// Build a URL slug: lowercase ASCII alphanumerics separated by single hyphens.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_hyphen = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: 7,
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            author: "ann".to_string(),
            body: "Body".to_string(),
            publish: "2024-01-05 23:30:00".to_string(),
            created_at: "2024-01-05 23:30:00".to_string(),
            updated_at: "2024-01-05 23:30:00".to_string(),
            status: PostStatus::Published,
        }
    }

    #[test]
    fn test_post_status_roundtrip() {
        assert_eq!(PostStatus::Draft.as_str(), "draft");
        assert_eq!(PostStatus::Published.as_str(), "published");
        assert_eq!("PUBLISHED".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_is_published_at() {
        let mut post = sample_post();
        assert!(post.is_published_at("2024-01-06 00:00:00"));
        assert!(post.is_published_at("2024-01-05 23:30:00"));
        assert!(!post.is_published_at("2024-01-05 23:29:59"));

        post.status = PostStatus::Draft;
        assert!(!post.is_published_at("2030-01-01 00:00:00"));
    }

    #[test]
    fn test_absolute_path_uses_timezone() {
        let post = sample_post();
        assert_eq!(post.absolute_path("UTC"), "/blog/2024/1/5/hello/");
        assert_eq!(post.absolute_path("Asia/Tokyo"), "/blog/2024/1/6/hello/");
    }

    #[test]
    fn test_new_post_builder() {
        let post = NewPost::new("Rust & You", "body")
            .author("bob")
            .publish("2024-02-01 00:00:00")
            .published();

        assert_eq!(post.slug, "rust-you");
        assert_eq!(post.author, "bob");
        assert_eq!(post.publish, "2024-02-01 00:00:00");
        assert_eq!(post.status, PostStatus::Published);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Django -- Rust!  "), "django-rust");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
        assert_eq!(slugify("¿Qué?"), "qu");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_tag_path() {
        let tag = Tag {
            id: 1,
            name: "Music".to_string(),
            slug: "music".to_string(),
        };
        assert_eq!(tag.absolute_path(), "/blog/tag/music/");
    }
}
