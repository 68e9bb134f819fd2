//! Author-only mutation rights for posts and comments.

use uuid::Uuid;

use crate::domain::{Comment, Post, Viewer};
use crate::error::DomainError;

/// Entities owned by a single author.
pub trait Authored {
    fn author_id(&self) -> Uuid;

    /// The post whose page a denied viewer is sent back to.
    fn post_id(&self) -> Uuid;
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn post_id(&self) -> Uuid {
        self.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn post_id(&self) -> Uuid {
        self.post_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Denied { redirect_post_id: Uuid },
}

impl Authorization {
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Authorized => Ok(()),
            Self::Denied { redirect_post_id } => Err(DomainError::NotAuthor {
                post_id: redirect_post_id,
            }),
        }
    }
}

/// Only the author may edit or delete an entity. Anonymous viewers are
/// denied like any other non-author.
pub fn authorize<E: Authored + ?Sized>(entity: &E, viewer: &Viewer) -> Authorization {
    if viewer.is(entity.author_id()) {
        Authorization::Authorized
    } else {
        Authorization::Denied {
            redirect_post_id: entity.post_id(),
        }
    }
}
