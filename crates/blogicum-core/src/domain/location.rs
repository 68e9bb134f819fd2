use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifiable, TITLE_MAX_LENGTH};
use crate::error::DomainError;

/// Location entity - a place a post can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub is_published: bool,
}

impl NewLocation {
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > TITLE_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Name must be between 1 and {TITLE_MAX_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

impl Location {
    pub fn new(new: NewLocation, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            is_published: new.is_published,
            created_at: now,
        }
    }
}

impl Identifiable for Location {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}
