//! Post visibility.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Whether `post` is visible to everyone at `now`.
///
/// `category` is the post's category. A post without a category never
/// passes the published-category condition.
pub fn is_public(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && category.is_some_and(|c| c.is_published) && post.pub_date <= now
}

/// Decide whether `viewer` may see `post`. Authors always see their own posts.
pub fn visibility(
    post: &Post,
    category: Option<&Category>,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> Visibility {
    if viewer.is(post.author_id) || is_public(post, category, now) {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}
