//! Application services - the operations the HTTP layer exposes.
//!
//! Every call takes the [`Viewer`](crate::domain::Viewer) explicitly; the
//! visibility and ownership rules are applied here before touching the store.

mod accounts;
mod blog;
mod catalog;

use std::sync::Arc;

use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

pub use accounts::AccountService;
pub use blog::{BlogService, PostDetail};
pub use catalog::CatalogService;

/// The store, one port per entity.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
}
