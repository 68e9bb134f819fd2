//! User profile pages.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::ProfileChanges;
use blogicum_core::listing::parse_page_number;
use blogicum_shared::dto::{PageQuery, ProfileResponse, UpdateProfileRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=N
///
/// The owner also sees their unpublished and scheduled posts.
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = parse_page_number(query.page.as_deref());
    let (user, posts) = state
        .blog
        .profile(&identity.viewer(), &path.into_inner(), page)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: views::user(user),
        page: views::post_page(posts),
    }))
}

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .accounts
        .update_profile(
            &identity.viewer(),
            ProfileChanges {
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(views::user(user)))
}
