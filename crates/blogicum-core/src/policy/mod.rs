//! Access rules consulted before every read and mutation.

mod ownership;
mod visibility;

pub use ownership::{Authored, Authorization, authorize};
pub use visibility::{Visibility, is_public, visibility};
