//! Comment handlers. Comments are addressed under their post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::dto::CommentRequest;

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let record = state
        .blog
        .add_comment(&identity.viewer(), path.into_inner(), body.into_inner().text)
        .await?;

    tracing::info!(
        comment_id = %record.comment.id,
        post_id = %record.comment.post_id,
        "Comment added"
    );
    Ok(HttpResponse::Created().json(views::comment(record)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let record = state
        .blog
        .update_comment(&identity.viewer(), post_id, comment_id, body.into_inner().text)
        .await?;

    Ok(HttpResponse::Ok().json(views::comment(record)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .blog
        .delete_comment(&identity.viewer(), post_id, comment_id)
        .await?;

    tracing::info!(%comment_id, %post_id, "Comment deleted");
    Ok(HttpResponse::NoContent().finish())
}
