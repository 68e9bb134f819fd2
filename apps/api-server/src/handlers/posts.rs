//! Post listing, detail and author-only mutations.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use blogicum_core::domain::{PostDraft, Viewer};
use blogicum_core::listing::parse_page_number;
use blogicum_shared::dto::{PageQuery, PostRequest, PostResponse};

use super::{post_detail_path, views};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=N
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = parse_page_number(query.page.as_deref());
    let posts = state.blog.index(&identity.viewer(), page).await?;

    Ok(HttpResponse::Ok().json(views::post_page(posts)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let post = state.blog.create_post(&viewer, draft(body.into_inner())).await?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    let created = record(&state, &viewer, post.id).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, post_detail_path(post.id)))
        .json(created))
}

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(&identity.viewer(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(views::post_detail(detail)))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let viewer = identity.viewer();
    let post = state
        .blog
        .update_post(&viewer, path.into_inner(), draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(record(&state, &viewer, post.id).await?))
}

/// DELETE /api/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.blog.delete_post(&identity.viewer(), post_id).await?;

    tracing::info!(%post_id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}

fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        category_id: req.category_id,
        location_id: req.location_id,
    }
}

/// Re-read a post the viewer just wrote; authors always see their own posts.
async fn record(state: &AppState, viewer: &Viewer, post_id: Uuid) -> AppResult<PostResponse> {
    let detail = state.blog.post_detail(viewer, post_id).await?;
    Ok(views::post(detail.post))
}
