//! Blog service: the operations behind each page.
//!
//! The service fixes "now" when it is created, so every query in one request
//! sees the same set of published posts.

use tracing::{debug, info, warn};

use super::forms::{CommentForm, EmailPostForm, FormErrors, SearchForm};
use super::pagination::{Page, Pagination, POSTS_PER_PAGE};
use super::search::{self, SearchHit};
use super::types::{Comment, NewComment, Post, Tag};
use super::{CommentRepository, PostRepository, TagRepository};
use crate::datetime;
use crate::db::Database;
use crate::mail::{recommendation_mail, MailTransport};
use crate::{BlogError, Result};

/// Maximum number of similar posts shown under a post.
pub const SIMILAR_POSTS_LIMIT: i64 = 4;

/// A post together with its tags.
#[derive(Debug, Clone)]
pub struct TaggedPost {
    pub post: Post,
    pub tags: Vec<Tag>,
}

/// One page of the post list, optionally filtered by tag.
#[derive(Debug, Clone)]
pub struct PostList {
    pub tag: Option<Tag>,
    pub page: Page<TaggedPost>,
}

/// Everything shown on a post's page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub similar_posts: Vec<Post>,
}

/// Result of submitting the share form.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub post: Post,
    pub form: EmailPostForm,
    pub errors: FormErrors,
    pub sent: bool,
}

/// Result of submitting a comment.
#[derive(Debug, Clone)]
pub struct CommentOutcome {
    pub post: Post,
    pub form: CommentForm,
    pub errors: FormErrors,
    pub comment: Option<Comment>,
}

/// Search results for a query.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub query: Option<String>,
    pub hits: Vec<SearchHit>,
}

/// Service for reader-facing blog operations.
pub struct BlogService<'a> {
    db: &'a Database,
    timezone: &'a str,
    now: String,
}

impl<'a> BlogService<'a> {
    /// Create a service for the current instant.
    ///
    /// `timezone` decides which calendar day a post belongs to.
    pub fn new(db: &'a Database, timezone: &'a str) -> Self {
        Self {
            db,
            timezone,
            now: datetime::now_db_string(),
        }
    }

    /// Pin "now" to a fixed instant (storage format).
    pub fn at(mut self, now: impl Into<String>) -> Self {
        self.now = now.into();
        self
    }

    /// The instant this service treats as now.
    pub fn now(&self) -> &str {
        &self.now
    }

    /// List published posts, newest first, one page at a time.
    ///
    /// With a tag slug, only posts carrying that tag are listed; an unknown
    /// tag is not found.
    pub async fn list_posts(&self, tag_slug: Option<&str>, page: Option<&str>) -> Result<PostList> {
        let posts = PostRepository::new(self.db.pool());

        let tag = match tag_slug {
            Some(slug) => Some(
                TagRepository::new(self.db.pool())
                    .get_by_slug(slug)
                    .await?
                    .ok_or_else(|| BlogError::NotFound("tag".to_string()))?,
            ),
            None => None,
        };

        let total = match &tag {
            Some(tag) => posts.count_published_by_tag(tag.id, &self.now).await?,
            None => posts.count_published(&self.now).await?,
        };
        let pagination = Pagination::resolve(page, total, POSTS_PER_PAGE);

        let items = match &tag {
            Some(tag) => {
                posts
                    .list_published_by_tag(tag.id, &self.now, pagination.limit, pagination.offset)
                    .await?
            }
            None => {
                posts
                    .list_published(&self.now, pagination.limit, pagination.offset)
                    .await?
            }
        };

        debug!(
            tag = tag_slug.unwrap_or(""),
            page = pagination.number,
            num_pages = pagination.num_pages,
            "listing posts"
        );

        let items = self.with_tags(items).await?;
        Ok(PostList {
            tag,
            page: pagination.into_page(items, total),
        })
    }

    /// Load a published post by its canonical date and slug.
    pub async fn post_detail(&self, year: i32, month: u32, day: u32, slug: &str) -> Result<PostDetail> {
        let post = PostRepository::new(self.db.pool())
            .get_published_by_date_slug(year, month, day, slug, self.timezone, &self.now)
            .await?
            .ok_or_else(|| BlogError::NotFound("post".to_string()))?;

        let tags = TagRepository::new(self.db.pool())
            .list_for_post(post.id)
            .await?;
        let comments = CommentRepository::new(self.db.pool())
            .list_active_for_post(post.id)
            .await?;
        let similar_posts = self.similar_posts(&post).await?;

        Ok(PostDetail {
            post,
            tags,
            comments,
            similar_posts,
        })
    }

    /// Up to four other published posts sharing the most tags with `post`.
    pub async fn similar_posts(&self, post: &Post) -> Result<Vec<Post>> {
        PostRepository::new(self.db.pool())
            .similar_posts(post.id, &self.now, SIMILAR_POSTS_LIMIT)
            .await
    }

    /// Load a published post by ID.
    pub async fn published_post(&self, post_id: i64) -> Result<Post> {
        PostRepository::new(self.db.pool())
            .get_published_by_id(post_id, &self.now)
            .await?
            .ok_or_else(|| BlogError::NotFound("post".to_string()))
    }

    /// Canonical path of a post.
    pub fn post_path(&self, post: &Post) -> String {
        post.absolute_path(self.timezone)
    }

    /// Validate the share form and, if valid, mail the recommendation.
    ///
    /// `site_root` is the scheme and host the post link is built on.
    /// Invalid forms send nothing; a delivery failure is an error.
    pub async fn share_post(
        &self,
        transport: &dyn MailTransport,
        post_id: i64,
        form: EmailPostForm,
        site_root: &str,
    ) -> Result<ShareOutcome> {
        let post = self.published_post(post_id).await?;

        let form = form.normalized();
        let errors = form.errors();
        if !errors.is_empty() {
            debug!(post_id, "share form rejected");
            return Ok(ShareOutcome {
                post,
                form,
                errors,
                sent: false,
            });
        }

        let post_url = format!("{}{}", site_root.trim_end_matches('/'), self.post_path(&post));
        let mail = recommendation_mail(&form, &post, &post_url);

        if let Err(e) = transport.send(&mail).await {
            warn!(post_id, transport = transport.name(), "failed to send recommendation: {}", e);
            return Err(e);
        }
        info!(post_id, to = %form.to, "post recommendation sent");

        Ok(ShareOutcome {
            post,
            form,
            errors: FormErrors::default(),
            sent: true,
        })
    }

    /// Validate and store a comment on a published post.
    pub async fn add_comment(&self, post_id: i64, form: CommentForm) -> Result<CommentOutcome> {
        let post = self.published_post(post_id).await?;

        let form = form.normalized();
        let errors = form.errors();
        if !errors.is_empty() {
            debug!(post_id, "comment form rejected");
            return Ok(CommentOutcome {
                post,
                form,
                errors,
                comment: None,
            });
        }

        let comment = CommentRepository::new(self.db.pool())
            .create(&NewComment::new(post.id, &form.name, &form.email, &form.body))
            .await?;
        info!(post_id, comment_id = comment.id, "comment created");

        Ok(CommentOutcome {
            post,
            form,
            errors: FormErrors::default(),
            comment: Some(comment),
        })
    }

    /// Rank published posts against the search query.
    ///
    /// A blank query runs no search.
    pub async fn search(&self, form: &SearchForm) -> Result<SearchResults> {
        let Some(query) = form.query() else {
            return Ok(SearchResults::default());
        };

        let terms = form.terms();
        let candidates = PostRepository::new(self.db.pool())
            .search_candidates(&self.now)
            .await?;
        let hits = search::rank_posts(candidates, &terms);
        debug!(query, terms = terms.len(), hits = hits.len(), "search");

        Ok(SearchResults {
            query: Some(query.to_string()),
            hits,
        })
    }

    async fn with_tags(&self, posts: Vec<Post>) -> Result<Vec<TaggedPost>> {
        let tags = TagRepository::new(self.db.pool());
        let mut tagged = Vec::with_capacity(posts.len());
        for post in posts {
            let post_tags = tags.list_for_post(post.id).await?;
            tagged.push(TaggedPost {
                post,
                tags: post_tags,
            });
        }
        Ok(tagged)
    }
}
