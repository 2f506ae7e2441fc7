//! "Recommend this post" message.

use super::OutgoingMail;
use crate::blog::{EmailPostForm, Post};

/// Compose the message recommending `post` (found at `post_url`) to the
/// form's recipient.
pub fn recommendation_mail(form: &EmailPostForm, post: &Post, post_url: &str) -> OutgoingMail {
    OutgoingMail {
        from: form.email.clone(),
        to: form.to.clone(),
        subject: format!("{} recommends you read {}", form.name, post.title),
        body: format!(
            "Read {} at {}\n\n{} comments: {}",
            post.title, post_url, form.name, form.comments
        ),
    }
}
