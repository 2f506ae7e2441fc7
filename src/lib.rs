//! blogsite - a small blog web application
//!
//! Published posts with tags, paginated lists, comments, sharing a post by
//! email and full-text search, served as HTML pages over HTTP.

pub mod blog;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod template;
pub mod web;

pub use blog::{BlogService, Comment, NewComment, NewPost, Post, PostStatus, Tag};
pub use config::Config;
pub use db::Database;
pub use error::{BlogError, Result};
pub use web::WebServer;
