use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Identifiable, Location, TITLE_MAX_LENGTH};
use crate::error::DomainError;

/// Post entity - a blog publication.
///
/// A post with a `pub_date` in the future is a scheduled publication: it stays
/// hidden from everyone but its author until that moment passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Author-editable fields of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl PostDraft {
    /// Check field constraints that don't need the store.
    pub fn validate(&self) -> Result<(), DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title must not be empty".into()));
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Title must be at most {TITLE_MAX_LENGTH} characters"
            )));
        }
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("Text must not be empty".into()));
        }
        Ok(())
    }
}

impl Post {
    /// Create a published post authored by `author_id`.
    /// A draft without a publish date is published at `now`.
    pub fn new(author_id: Uuid, draft: PostDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            text: draft.text,
            pub_date: draft.pub_date.unwrap_or(now),
            author_id,
            location_id: draft.location_id,
            category_id: draft.category_id,
            is_published: true,
            created_at: now,
        }
    }

    /// Replace the author-editable fields. The publish date is kept when the
    /// draft leaves it empty.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title.trim().to_string();
        self.text = draft.text;
        if let Some(pub_date) = draft.pub_date {
            self.pub_date = pub_date;
        }
        self.category_id = draft.category_id;
        self.location_id = draft.location_id;
    }
}

impl Identifiable for Post {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A post joined with its relations and annotated with its comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub post: Post,
    pub author_username: String,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
