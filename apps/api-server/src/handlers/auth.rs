//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blogicum_core::domain::{NewAccount, User};
use blogicum_core::ports::TokenService;
use blogicum_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::views;
use crate::middleware::auth::{Identity, STAFF_ROLE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .register(NewAccount {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&user, token_service.get_ref().as_ref())?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .authenticate(&req.username, &req.password)
        .await?;

    Ok(HttpResponse::Ok().json(issue_token(&user, token_service.get_ref().as_ref())?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.find_by_id(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}

fn issue_token(user: &User, token_service: &dyn TokenService) -> AppResult<AuthResponse> {
    let mut roles = vec!["user".to_string()];
    if user.is_staff {
        roles.push(STAFF_ROLE.to_string());
    }

    let token = token_service
        .generate_token(user.id, &user.username, roles)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    })
}
