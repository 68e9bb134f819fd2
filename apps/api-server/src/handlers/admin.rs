//! Staff-only catalog management and moderation.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::domain::{NewCategory, NewLocation};
use blogicum_shared::dto::{
    CreateCategoryRequest, CreateLocationRequest, PublicationRequest, PublicationStatus,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .catalog
        .create_category(
            &identity.viewer(),
            NewCategory {
                title: req.title,
                description: req.description,
                slug: req.slug,
                is_published: req.is_published,
            },
        )
        .await?;

    tracing::info!(slug = %category.slug, by = %identity.username, "Category created");
    Ok(HttpResponse::Created().json(views::category(category)))
}

/// POST /api/admin/locations
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateLocationRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let location = state
        .catalog
        .create_location(
            &identity.viewer(),
            NewLocation {
                name: req.name,
                is_published: req.is_published,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(views::location(location)))
}

/// PUT /api/admin/posts/{post_id}/publication
pub async fn post_publication(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PublicationRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .catalog
        .set_post_publication(&identity.viewer(), path.into_inner(), body.is_published)
        .await?;

    tracing::info!(post_id = %post.id, is_published = post.is_published, by = %identity.username, "Post publication changed");
    Ok(HttpResponse::Ok().json(PublicationStatus {
        id: post.id,
        is_published: post.is_published,
    }))
}

/// PUT /api/admin/categories/{slug}/publication
pub async fn category_publication(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PublicationRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .catalog
        .set_category_publication(&identity.viewer(), &path.into_inner(), body.is_published)
        .await?;

    Ok(HttpResponse::Ok().json(views::category(category)))
}

/// PUT /api/admin/locations/{location_id}/publication
pub async fn location_publication(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PublicationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .catalog
        .set_location_publication(&identity.viewer(), path.into_inner(), body.is_published)
        .await?;

    Ok(HttpResponse::Ok().json(views::location(location)))
}
