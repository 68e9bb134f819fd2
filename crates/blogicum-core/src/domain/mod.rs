//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;
mod viewer;

pub use category::{Category, NewCategory, is_valid_slug};
pub use comment::{Comment, CommentRecord};
pub use location::{Location, NewLocation};
pub use post::{Post, PostDraft, PostRecord};
pub use user::{NewAccount, ProfileChanges, User, validate_email, validate_username};
pub use viewer::Viewer;

/// Maximum length of titles and names.
pub const TITLE_MAX_LENGTH: usize = 256;

/// Maximum length of usernames.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Entities addressable by a primary key.
pub trait Identifiable {
    type Id;

    fn id(&self) -> Self::Id;
}
