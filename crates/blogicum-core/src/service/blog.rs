use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::Repositories;
use crate::domain::{
    Category, Comment, CommentRecord, Post, PostDraft, PostRecord, User, Viewer,
};
use crate::error::DomainError;
use crate::listing::{ListingScope, Page, PostFilter, assemble_page};
use crate::policy::{Visibility, authorize, visibility};
use crate::ports::Clock;

/// A post page: the post and its comments, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostRecord,
    pub comments: Vec<CommentRecord>,
}

/// Posts and comments: listings, detail pages and author-only mutations.
pub struct BlogService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
    page_size: u64,
}

impl BlogService {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>, page_size: u64) -> Self {
        Self {
            repos,
            clock,
            page_size,
        }
    }

    /// Index listing: every public post.
    pub async fn index(&self, viewer: &Viewer, page: i64) -> Result<Page<PostRecord>, DomainError> {
        self.listing(ListingScope::All, viewer, page).await
    }

    /// Public posts of a published category.
    pub async fn category_posts(
        &self,
        viewer: &Viewer,
        slug: &str,
        page: i64,
    ) -> Result<(Category, Page<PostRecord>), DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("Category", slug))?;

        let posts = self
            .listing(ListingScope::Category(category.id), viewer, page)
            .await?;
        Ok((category, posts))
    }

    /// A user's posts. The owner sees drafts and scheduled posts too.
    pub async fn profile(
        &self,
        viewer: &Viewer,
        username: &str,
        page: i64,
    ) -> Result<(User, Page<PostRecord>), DomainError> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;

        let posts = self
            .listing(ListingScope::Author(user.id), viewer, page)
            .await?;
        Ok((user, posts))
    }

    /// A hidden post is reported exactly like a missing one.
    pub async fn post_detail(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
    ) -> Result<PostDetail, DomainError> {
        let post = self.visible_record(viewer, post_id).await?;
        let comments = self.repos.comments.find_by_post(post_id).await?;

        Ok(PostDetail { post, comments })
    }

    pub async fn create_post(&self, viewer: &Viewer, draft: PostDraft) -> Result<Post, DomainError> {
        let author_id = viewer.require_user()?;
        self.check_draft(&draft).await?;

        let post = Post::new(author_id, draft, self.clock.now());
        Ok(self.repos.posts.save(post).await?)
    }

    pub async fn update_post(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let mut post = self.find_post(post_id).await?;
        authorize(&post, viewer).into_result()?;
        self.check_draft(&draft).await?;

        post.apply(draft);
        Ok(self.repos.posts.save(post).await?)
    }

    /// Deletes the post along with its comments.
    pub async fn delete_post(&self, viewer: &Viewer, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.find_post(post_id).await?;
        authorize(&post, viewer).into_result()?;

        Ok(self.repos.posts.delete(post.id).await?)
    }

    /// Comment on a post the viewer can see.
    pub async fn add_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        text: String,
    ) -> Result<CommentRecord, DomainError> {
        let author_id = viewer.require_user()?;
        self.visible_record(viewer, post_id).await?;
        Comment::validate_text(&text)?;

        let comment = Comment::new(author_id, post_id, text, self.clock.now());
        let saved = self.repos.comments.save(comment).await?;
        self.comment_record(saved).await
    }

    pub async fn update_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> Result<CommentRecord, DomainError> {
        let mut comment = self.find_comment(post_id, comment_id).await?;
        authorize(&comment, viewer).into_result()?;
        Comment::validate_text(&text)?;

        comment.text = text;
        let saved = self.repos.comments.save(comment).await?;
        self.comment_record(saved).await
    }

    pub async fn delete_comment(
        &self,
        viewer: &Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DomainError> {
        let comment = self.find_comment(post_id, comment_id).await?;
        authorize(&comment, viewer).into_result()?;

        Ok(self.repos.comments.delete(comment.id).await?)
    }

    /// Joins the comment with its author's current username.
    async fn comment_record(&self, comment: Comment) -> Result<CommentRecord, DomainError> {
        let author = self
            .repos
            .users
            .find_by_id(comment.author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", comment.author_id))?;

        Ok(CommentRecord {
            comment,
            author_username: author.username,
        })
    }

    async fn listing(
        &self,
        scope: ListingScope,
        viewer: &Viewer,
        page: i64,
    ) -> Result<Page<PostRecord>, DomainError> {
        let filter = PostFilter::for_scope(scope, viewer, self.clock.now());
        Ok(assemble_page(self.repos.posts.as_ref(), &filter, page, self.page_size).await?)
    }

    async fn visible_record(&self, viewer: &Viewer, post_id: Uuid) -> Result<PostRecord, DomainError> {
        let record = self
            .repos
            .posts
            .find_record(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        match visibility(
            &record.post,
            record.category.as_ref(),
            viewer,
            self.clock.now(),
        ) {
            Visibility::Visible => Ok(record),
            Visibility::Hidden => Err(DomainError::not_found("Post", post_id)),
        }
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    /// The comment must hang under the post named in the request.
    async fn find_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))
    }

    async fn check_draft(&self, draft: &PostDraft) -> Result<(), DomainError> {
        draft.validate()?;

        if let Some(category_id) = draft.category_id {
            if self.repos.categories.find_by_id(category_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Unknown category {category_id}"
                )));
            }
        }
        if let Some(location_id) = draft.location_id {
            if self.repos.locations.find_by_id(location_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Unknown location {location_id}"
                )));
            }
        }
        Ok(())
    }
}
