use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identifiable;
use crate::error::DomainError;

/// Comment entity - a reader's reply under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: Uuid, post_id: Uuid, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author_id,
            post_id,
            created_at: now,
        }
    }

    pub fn validate_text(text: &str) -> Result<(), DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation(
                "Comment text must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Identifiable for Comment {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author_username: String,
}
