//! Web Blog Tests
//!
//! Integration tests for post lists, tags and post detail pages.

mod common;

use axum::http::StatusCode;
use common::{create_test_app, draft_post, publish_post, tag_post};

#[tokio::test]
async fn test_root_redirects_to_blog() {
    let app = create_test_app().await;

    let response = app.server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "/blog/");
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_empty_list() {
    let app = create_test_app().await;

    let response = app.server.get("/blog/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<title>Posts | Test Blog</title>"));
    assert!(html.contains("No posts yet."));
    assert!(html.contains("Page 1 of 1."));
}

#[tokio::test]
async fn test_list_shows_only_published_posts() {
    let app = create_test_app().await;
    publish_post(&app.db, "Visible post", "body", "2024-01-01 00:00:00").await;
    draft_post(&app.db, "Draft post", "2024-01-02 00:00:00").await;
    publish_post(&app.db, "Future post", "body", "2999-01-01 00:00:00").await;

    let html = app.server.get("/blog/").await.text();
    assert!(html.contains("Visible post"));
    assert!(!html.contains("Draft post"));
    assert!(!html.contains("Future post"));
}

#[tokio::test]
async fn test_pagination() {
    let app = create_test_app().await;
    for i in 1..=7 {
        publish_post(
            &app.db,
            &format!("Entry number {i}"),
            "body",
            &format!("2024-01-0{i} 00:00:00"),
        )
        .await;
    }

    let html = app.server.get("/blog/").await.text();
    assert!(html.contains("Entry number 7"));
    assert!(html.contains("Entry number 5"));
    assert!(!html.contains("Entry number 4"));
    assert!(html.contains("Page 1 of 3."));
    assert!(html.contains("href=\"?page=2\""));

    let html = app
        .server
        .get("/blog/")
        .add_query_param("page", "2")
        .await
        .text();
    assert!(html.contains("Entry number 4"));
    assert!(html.contains("Page 2 of 3."));
    assert!(html.contains("href=\"?page=1\""));
    assert!(html.contains("href=\"?page=3\""));
}

#[tokio::test]
async fn test_pagination_clamps_bad_pages() {
    let app = create_test_app().await;
    for i in 1..=7 {
        publish_post(
            &app.db,
            &format!("Entry number {i}"),
            "body",
            &format!("2024-01-0{i} 00:00:00"),
        )
        .await;
    }

    for page in ["abc", "0", "-2"] {
        let response = app.server.get("/blog/").add_query_param("page", page).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{page}");
        let html = response.text();
        assert!(html.contains("Page 1 of 3."), "{page}");
        assert!(html.contains("Entry number 7"), "{page}");
    }

    let html = app
        .server
        .get("/blog/")
        .add_query_param("page", "99")
        .await
        .text();
    assert!(html.contains("Page 3 of 3."));
    assert!(html.contains("Entry number 1"));
    assert!(!html.contains("Entry number 2"));
}

#[tokio::test]
async fn test_list_by_tag() {
    let app = create_test_app().await;
    let tagged = publish_post(&app.db, "Tagged post", "body", "2024-01-01 00:00:00").await;
    publish_post(&app.db, "Untagged post", "body", "2024-01-02 00:00:00").await;
    tag_post(&app.db, &tagged, "Rust Lang").await;

    let response = app.server.get("/blog/tag/rust-lang/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<title>Posts tagged with &quot;Rust Lang&quot; | Test Blog</title>"));
    assert!(html.contains("Posts tagged with \"Rust Lang\""));
    assert!(html.contains("Tagged post"));
    assert!(!html.contains("Untagged post"));
}

#[tokio::test]
async fn test_unknown_tag_is_not_found() {
    let app = create_test_app().await;

    let response = app.server.get("/blog/tag/missing/").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("<title>Not Found | Test Blog</title>"));
}

#[tokio::test]
async fn test_post_detail() {
    let app = create_test_app().await;
    let post = publish_post(
        &app.db,
        "Hello world",
        "First paragraph\n\n<b>Second</b>",
        "2024-03-10 08:00:00",
    )
    .await;
    tag_post(&app.db, &post, "rust").await;

    let response = app.server.get("/blog/2024/3/10/hello-world/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<h1>Hello world</h1>"));
    assert!(html.contains("<p>First paragraph</p>"));
    assert!(html.contains("&lt;b&gt;Second&lt;/b&gt;"));
    assert!(html.contains("href=\"/blog/tag/rust/\""));
    assert!(html.contains(&format!("action=\"/blog/{}/comment/\"", post.id)));
    assert!(html.contains("There are no comments."));
    assert!(html.contains("There are no similar posts yet."));
}

#[tokio::test]
async fn test_post_detail_similar_posts() {
    let app = create_test_app().await;
    let post = publish_post(&app.db, "Main post", "body", "2024-03-10 08:00:00").await;
    let close = publish_post(&app.db, "Close match", "body", "2024-01-01 00:00:00").await;
    let loose = publish_post(&app.db, "Loose match", "body", "2024-02-01 00:00:00").await;
    publish_post(&app.db, "No match", "body", "2024-02-02 00:00:00").await;

    for name in ["rust", "web"] {
        tag_post(&app.db, &post, name).await;
        tag_post(&app.db, &close, name).await;
    }
    tag_post(&app.db, &loose, "web").await;

    let html = app.server.get("/blog/2024/3/10/main-post/").await.text();
    let close_at = html.find("Close match").expect("close match listed");
    let loose_at = html.find("Loose match").expect("loose match listed");
    assert!(close_at < loose_at);
    assert!(!html.contains("No match"));
}

#[tokio::test]
async fn test_post_detail_not_found() {
    let app = create_test_app().await;
    publish_post(&app.db, "Hello", "body", "2024-03-10 08:00:00").await;
    draft_post(&app.db, "Draft", "2024-03-10 08:00:00").await;
    publish_post(&app.db, "Soon", "body", "2999-03-10 08:00:00").await;

    for path in [
        "/blog/2024/3/11/hello/",
        "/blog/2023/3/10/hello/",
        "/blog/2024/3/10/draft/",
        "/blog/2999/3/10/soon/",
        "/blog/2024/13/10/hello/",
        "/blog/2024/march/10/hello/",
        "/blog/2024/3/10/missing/",
    ] {
        let response = app.server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app().await;

    let response = app.server.get("/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("The page you requested does not exist."));
}

#[tokio::test]
async fn test_security_headers() {
    let app = create_test_app().await;

    let response = app.server.get("/blog/").await;
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "DENY");
}
