//! Test helpers for web integration tests.
//!
//! Builds the full router over an in-memory database and a mail transport
//! that records messages.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;

use blogsite::blog::{CommentRepository, NewPost, PostRepository, TagRepository};
use blogsite::mail::MemoryTransport;
use blogsite::template::TemplateLoader;
use blogsite::web::AppState;
use blogsite::{Config, Database, Post, Tag, WebServer};

/// Site root used for absolute links in tests.
pub const BASE_URL: &str = "http://blog.test";

/// A running test application.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub mail: MemoryTransport,
}

/// Create a test configuration.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.site.name = "Test Blog".to_string();
    config.site.base_url = Some(BASE_URL.to_string());
    config
}

/// Create a test app with a working mail transport.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(create_test_config(), MemoryTransport::new()).await
}

/// Create a test app with the given configuration and transport.
pub async fn create_test_app_with(config: Config, mail: MemoryTransport) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let state = AppState::new(config, db.clone(), Arc::new(mail.clone()))
        .with_templates(TemplateLoader::builtin());
    let addr = "127.0.0.1:0".parse().expect("valid address");
    let router = WebServer::from_state(addr, state).router();

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, db, mail }
}

/// Create a published post.
pub async fn publish_post(db: &Database, title: &str, body: &str, publish: &str) -> Post {
    PostRepository::new(db.pool())
        .create(&NewPost::new(title, body).publish(publish).published())
        .await
        .expect("Failed to create post")
}

/// Create a draft post.
pub async fn draft_post(db: &Database, title: &str, publish: &str) -> Post {
    PostRepository::new(db.pool())
        .create(&NewPost::new(title, "draft body").publish(publish))
        .await
        .expect("Failed to create post")
}

/// Tag a post, creating the tag if needed.
pub async fn tag_post(db: &Database, post: &Post, name: &str) -> Tag {
    let tag = TagRepository::new(db.pool())
        .get_or_create(name)
        .await
        .expect("Failed to create tag");
    PostRepository::new(db.pool())
        .add_tag(post.id, tag.id)
        .await
        .expect("Failed to tag post");
    tag
}

/// Number of comments stored for a post.
pub async fn comment_count(db: &Database, post: &Post) -> i64 {
    CommentRepository::new(db.pool())
        .count_for_post(post.id)
        .await
        .expect("Failed to count comments")
}
