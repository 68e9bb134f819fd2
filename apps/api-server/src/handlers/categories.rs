//! Category and location browsing.

use actix_web::{HttpResponse, web};

use blogicum_core::listing::parse_page_number;
use blogicum_shared::dto::{CategoryPostsResponse, CategoryResponse, LocationResponse, PageQuery};

use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<CategoryResponse> = state
        .catalog
        .published_categories()
        .await?
        .into_iter()
        .map(views::category)
        .collect();

    Ok(HttpResponse::Ok().json(categories))
}

/// GET /api/categories/{slug}?page=N
pub async fn posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = parse_page_number(query.page.as_deref());
    let (category, posts) = state
        .blog
        .category_posts(&identity.viewer(), &path.into_inner(), page)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: views::category(category),
        page: views::post_page(posts),
    }))
}

/// GET /api/locations
pub async fn locations(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations: Vec<LocationResponse> = state
        .catalog
        .published_locations()
        .await?
        .into_iter()
        .map(views::location)
        .collect();

    Ok(HttpResponse::Ok().json(locations))
}
