//! Template data for blog pages.
//!
//! Domain values are flattened into JSON objects carrying display strings
//! and links, so templates never compute anything.

use serde_json::{json, Value as JsonValue};

use crate::blog::{Comment, Post, SearchHit, Tag, TaggedPost};
use crate::datetime::format_datetime_default;
use crate::template::{linebreaks, truncate_words};

/// Words shown in a post excerpt.
pub const EXCERPT_WORDS: usize = 30;

/// A post with its links and formatted publish date.
pub fn post(post: &Post, timezone: &str) -> JsonValue {
    json!({
        "id": post.id,
        "title": post.title,
        "slug": post.slug,
        "author": post.author,
        "publish": format_datetime_default(&post.publish, timezone),
        "excerpt": truncate_words(&post.body, EXCERPT_WORDS),
        "body_html": linebreaks(&post.body),
        "url": post.absolute_path(timezone),
        "share_url": format!("/blog/{}/share/", post.id),
        "comment_url": format!("/blog/{}/comment/", post.id),
    })
}

/// A post in a list, with its tags.
pub fn tagged_post(tagged: &TaggedPost, timezone: &str) -> JsonValue {
    let mut value = post(&tagged.post, timezone);
    value["tags"] = tags(&tagged.tags);
    value
}

/// Tags with their list links.
pub fn tags(tags: &[Tag]) -> JsonValue {
    tags.iter().map(tag).collect()
}

/// A tag with its list link.
pub fn tag(tag: &Tag) -> JsonValue {
    json!({
        "name": tag.name,
        "slug": tag.slug,
        "url": tag.absolute_path(),
    })
}

/// Comments numbered from 1 in display order.
pub fn comments(comments: &[Comment], timezone: &str) -> JsonValue {
    comments
        .iter()
        .enumerate()
        .map(|(i, comment)| {
            json!({
                "number": i + 1,
                "name": comment.name,
                "created": format_datetime_default(&comment.created_at, timezone),
                "body_html": linebreaks(&comment.body),
            })
        })
        .collect()
}

/// Search hits as linked posts with their rank.
pub fn search_hits(hits: &[SearchHit], timezone: &str) -> JsonValue {
    hits.iter()
        .map(|hit| {
            let mut value = post(&hit.post, timezone);
            value["rank"] = json!(hit.rank);
            value
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::PostStatus;

    fn sample_post() -> Post {
        Post {
            id: 7,
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            author: "ann".to_string(),
            body: "First line\nsecond line\n\nNew paragraph".to_string(),
            publish: "2024-03-10 23:30:00".to_string(),
            created_at: "2024-03-10 23:30:00".to_string(),
            updated_at: "2024-03-10 23:30:00".to_string(),
            status: PostStatus::Published,
        }
    }

    #[test]
    fn test_post_links() {
        let value = post(&sample_post(), "UTC");
        assert_eq!(value["url"], "/blog/2024/3/10/hello/");
        assert_eq!(value["share_url"], "/blog/7/share/");
        assert_eq!(value["comment_url"], "/blog/7/comment/");
        assert_eq!(value["publish"], "Mar 10, 2024, 23:30");
        assert_eq!(
            value["body_html"],
            "<p>First line<br>second line</p>\n<p>New paragraph</p>"
        );
    }

    #[test]
    fn test_post_url_uses_timezone() {
        let value = post(&sample_post(), "Europe/Madrid");
        assert_eq!(value["url"], "/blog/2024/3/11/hello/");
    }

    #[test]
    fn test_comments_numbered() {
        let comment = |id: i64, body: &str| Comment {
            id,
            post_id: 7,
            name: "bob".to_string(),
            email: "bob@example.com".to_string(),
            body: body.to_string(),
            created_at: "2024-03-11 08:00:00".to_string(),
            updated_at: "2024-03-11 08:00:00".to_string(),
            active: true,
        };

        let value = comments(&[comment(1, "a"), comment(2, "<b>")], "UTC");
        assert_eq!(value[0]["number"], 1);
        assert_eq!(value[1]["number"], 2);
        assert_eq!(value[1]["body_html"], "<p>&lt;b&gt;</p>");
    }
}
