//! # Blogicum Core
//!
//! The domain layer of Blogicum.
//! Entities, the post visibility and ownership rules, listing assembly and
//! the application services. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod listing;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
