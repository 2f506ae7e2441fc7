//! Renders error responses with the site's templates.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::web::error::ErrorPage;
use crate::web::state::AppState;

/// Replace the body of any response carrying an [`ErrorPage`] with the
/// rendered `error` template.
///
/// If the error page itself cannot be rendered, the bare response is kept.
pub async fn error_pages(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(req).await;
    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    let title = page.status.canonical_reason().unwrap_or("Error");
    let data = json!({
        "status": page.status.as_u16(),
        "message": page.message,
    });

    match state.render("error", title, data) {
        Ok(html) => (page.status, html).into_response(),
        Err(_) => response,
    }
}
