use std::sync::Arc;

use uuid::Uuid;

use super::Repositories;
use crate::domain::{Category, Location, NewCategory, NewLocation, Post, Viewer};
use crate::error::DomainError;
use crate::ports::Clock;

/// Categories, locations and publication flags. Writes are staff only.
pub struct CatalogService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    pub async fn published_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.repos.categories.list_published().await?)
    }

    pub async fn published_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.repos.locations.list_published().await?)
    }

    pub async fn create_category(
        &self,
        viewer: &Viewer,
        new: NewCategory,
    ) -> Result<Category, DomainError> {
        viewer.require_staff()?;
        new.validate()?;

        if self.repos.categories.find_by_slug(&new.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Category slug '{}' already exists",
                new.slug
            )));
        }

        let category = Category::new(new, self.clock.now());
        Ok(self.repos.categories.save(category).await?)
    }

    pub async fn create_location(
        &self,
        viewer: &Viewer,
        new: NewLocation,
    ) -> Result<Location, DomainError> {
        viewer.require_staff()?;
        new.validate()?;

        let location = Location::new(new, self.clock.now());
        Ok(self.repos.locations.save(location).await?)
    }

    pub async fn set_post_publication(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        is_published: bool,
    ) -> Result<Post, DomainError> {
        viewer.require_staff()?;

        let mut post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        post.is_published = is_published;
        Ok(self.repos.posts.save(post).await?)
    }

    pub async fn set_category_publication(
        &self,
        viewer: &Viewer,
        slug: &str,
        is_published: bool,
    ) -> Result<Category, DomainError> {
        viewer.require_staff()?;

        let mut category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", slug))?;
        category.is_published = is_published;
        Ok(self.repos.categories.save(category).await?)
    }

    pub async fn set_location_publication(
        &self,
        viewer: &Viewer,
        location_id: Uuid,
        is_published: bool,
    ) -> Result<Location, DomainError> {
        viewer.require_staff()?;

        let mut location = self
            .repos
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Location", location_id))?;
        location.is_published = is_published;
        Ok(self.repos.locations.save(location).await?)
    }
}
