//! Router configuration for the blog.

use axum::{
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::error::WebError;
use super::handlers::{
    post_comment, post_detail, post_list, post_list_by_tag, post_search, share_form, share_post,
};
use super::middleware::{error_pages, security_headers};
use super::state::AppState;

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The first segment after /blog/ is a post ID or a year; the router
    // needs one parameter name per position.
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/blog/") }))
        .route("/blog/", get(post_list))
        .route("/blog/search/", get(post_search))
        .route("/blog/tag/:tag_slug/", get(post_list_by_tag))
        .route("/blog/:key/share/", get(share_form).post(share_post))
        .route("/blog/:key/comment/", post(post_comment))
        .route("/blog/:key/:month/:day/:slug/", get(post_detail))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    error_pages,
                )),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> WebError {
    WebError::not_found("The page you requested does not exist.")
}
