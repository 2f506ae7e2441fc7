//! Blog domain: posts, tags, comments and the reader-facing operations on them.

mod comment_repository;
pub mod forms;
pub mod pagination;
mod post_repository;
pub mod search;
mod service;
mod tag_repository;
mod types;

pub use comment_repository::CommentRepository;
pub use forms::{CommentForm, EmailPostForm, FormErrors, SearchForm};
pub use pagination::{Page, PageInfo, Pagination, POSTS_PER_PAGE};
pub use post_repository::PostRepository;
pub use search::SearchHit;
pub use service::{
    BlogService, CommentOutcome, PostDetail, PostList, SearchResults, ShareOutcome, TaggedPost,
    SIMILAR_POSTS_LIMIT,
};
pub use tag_repository::TagRepository;
pub use types::{slugify, Comment, NewComment, NewPost, Post, PostStatus, Tag};
