//! Blog page handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Host, Path, Query, State},
    response::Html,
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::blog::{CommentForm, EmailPostForm, FormErrors, SearchForm};
use crate::web::error::WebError;
use crate::web::state::AppState;
use crate::web::views;

/// Page indicator of a list request. Kept as text so that bad values fall
/// back to page 1 instead of being rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

/// GET /blog/ - Published posts, newest first.
pub async fn post_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, WebError> {
    render_list(&state, None, query.page.as_deref()).await
}

/// GET /blog/tag/:tag_slug/ - Published posts carrying a tag.
pub async fn post_list_by_tag(
    State(state): State<Arc<AppState>>,
    Path(tag_slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, WebError> {
    render_list(&state, Some(&tag_slug), query.page.as_deref()).await
}

async fn render_list(
    state: &AppState,
    tag_slug: Option<&str>,
    page: Option<&str>,
) -> Result<Html<String>, WebError> {
    let list = state.service().list_posts(tag_slug, page).await?;
    let tz = state.timezone();

    let posts: Vec<JsonValue> = list
        .page
        .items
        .iter()
        .map(|tagged| views::tagged_post(tagged, tz))
        .collect();
    let title = match &list.tag {
        Some(tag) => format!("Posts tagged with \"{}\"", tag.name),
        None => "Posts".to_string(),
    };

    state.render(
        "blog/post/list",
        &title,
        json!({
            "posts": posts,
            "tag": list.tag.as_ref().map(views::tag),
            "page": list.page.info(),
        }),
    )
}

/// GET /blog/:year/:month/:day/:slug/ - A single published post.
pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
) -> Result<Html<String>, WebError> {
    let year: i32 = path_number(&year)?;
    let month: u32 = path_number(&month)?;
    let day: u32 = path_number(&day)?;

    let detail = state.service().post_detail(year, month, day, &slug).await?;
    let tz = state.timezone();
    tracing::debug!(post_id = detail.post.id, "showing post");

    let similar: Vec<JsonValue> = detail
        .similar_posts
        .iter()
        .map(|post| views::post(post, tz))
        .collect();

    state.render(
        "blog/post/detail",
        &detail.post.title,
        json!({
            "post": views::post(&detail.post, tz),
            "tags": views::tags(&detail.tags),
            "comments": views::comments(&detail.comments, tz),
            "comment_count": detail.comments.len(),
            "single_comment": detail.comments.len() == 1,
            "similar_posts": similar,
        }),
    )
}

/// GET /blog/:id/share/ - Empty share form.
pub async fn share_form(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Html<String>, WebError> {
    let post_id: i64 = path_number(&post_id)?;
    let post = state.service().published_post(post_id).await?;

    state.render(
        "blog/post/share",
        &format!("Share {}", post.title),
        json!({
            "post": views::post(&post, state.timezone()),
            "form": EmailPostForm::default(),
            "errors": FormErrors::default(),
            "sent": false,
        }),
    )
}

/// POST /blog/:id/share/ - Mail a recommendation of the post.
pub async fn share_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    host: Option<Host>,
    Form(form): Form<EmailPostForm>,
) -> Result<Html<String>, WebError> {
    let post_id: i64 = path_number(&post_id)?;
    let site_root = state.site_root(host.as_ref().map(|Host(h)| h.as_str()))?;

    let outcome = state
        .service()
        .share_post(state.mail.as_ref(), post_id, form, &site_root)
        .await?;

    state.render(
        "blog/post/share",
        &format!("Share {}", outcome.post.title),
        json!({
            "post": views::post(&outcome.post, state.timezone()),
            "form": outcome.form,
            "errors": outcome.errors,
            "sent": outcome.sent,
        }),
    )
}

/// POST /blog/:id/comment/ - Add a comment to the post.
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Html<String>, WebError> {
    let post_id: i64 = path_number(&post_id)?;
    let outcome = state.service().add_comment(post_id, form).await?;

    state.render(
        "blog/post/comment",
        &format!("Comment on {}", outcome.post.title),
        json!({
            "post": views::post(&outcome.post, state.timezone()),
            "form": outcome.form,
            "errors": outcome.errors,
            "comment": outcome.comment.as_ref().map(|c| json!({ "id": c.id, "name": c.name })),
        }),
    )
}

/// GET /blog/search/ - Full-text search over published posts.
pub async fn post_search(
    State(state): State<Arc<AppState>>,
    Query(form): Query<SearchForm>,
) -> Result<Html<String>, WebError> {
    let results = state.service().search(&form).await?;
    let count = results.hits.len();

    state.render(
        "blog/post/search",
        "Search",
        json!({
            "query": results.query,
            "results": views::search_hits(&results.hits, state.timezone()),
            "result_count": count,
            "single_result": count == 1,
        }),
    )
}

/// Parse a numeric path segment; anything but plain digits is not found.
fn path_number<T: FromStr>(segment: &str) -> Result<T, WebError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WebError::not_found("The page you requested does not exist."));
    }
    segment
        .parse()
        .map_err(|_| WebError::not_found("The page you requested does not exist."))
}
