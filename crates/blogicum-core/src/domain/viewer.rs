use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The identity making the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viewer {
    Anonymous,
    User { id: Uuid, is_staff: bool },
}

impl Viewer {
    pub fn user(id: Uuid) -> Self {
        Self::User {
            id,
            is_staff: false,
        }
    }

    pub fn staff(id: Uuid) -> Self {
        Self::User { id, is_staff: true }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::User { id, .. } => Some(*id),
        }
    }

    /// Whether the viewer is the user with the given id.
    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id() == Some(user_id)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::User { is_staff: true, .. })
    }

    /// The viewer's user id, or `Unauthorized` for anonymous viewers.
    pub fn require_user(&self) -> Result<Uuid, DomainError> {
        self.user_id().ok_or(DomainError::Unauthorized)
    }

    pub fn require_staff(&self) -> Result<Uuid, DomainError> {
        let id = self.require_user()?;
        if !self.is_staff() {
            return Err(DomainError::Forbidden);
        }
        Ok(id)
    }
}
