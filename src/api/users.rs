use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{AuthResponse, LoginRequest, RegisterRequest},
    services::auth_service::{self, Claims, TokenService},
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid data or user already exists", body = crate::models::MessageResponse)
    )
)]
pub async fn register(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service::register(store.get_ref(), &tokens, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = crate::models::MessageResponse)
    )
)]
pub async fn login(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service::login(store.get_ref(), &tokens, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 🔒 GET /api/users/profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = crate::models::UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::models::MessageResponse),
        (status = 404, description = "User not found", body = crate::models::MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let profile = auth_service::profile(store.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(profile))
}
