use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifiable, TITLE_MAX_LENGTH};
use crate::error::DomainError;

/// Category entity - groups posts under a unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.chars().count() > TITLE_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Title must be at most {TITLE_MAX_LENGTH} characters"
            )));
        }
        if !is_valid_slug(&self.slug) {
            return Err(DomainError::Validation(
                "Slug may contain only latin letters, digits, hyphen and underscore".into(),
            ));
        }
        Ok(())
    }
}

impl Category {
    pub fn new(new: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            slug: new.slug,
            is_published: new.is_published,
            created_at: now,
        }
    }
}

impl Identifiable for Category {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Slugs are non-empty and limited to `[A-Za-z0-9_-]`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
