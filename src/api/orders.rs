use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{CreateOrderRequest, OrderResponse},
    services::{auth_service::Claims, order_service},
    utils::AppError,
};

// ==================== ORDERS API ====================
// Todas as rotas passam pelo AuthMiddleware (Claims vêm do JWT)

/// 🔒 POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "No order items, invalid item or total mismatch", body = crate::models::MessageResponse),
        (status = 401, description = "Missing or invalid token", body = crate::models::MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::create_order(store.get_ref(), &user, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

/// 🔒 GET /api/orders/myorders
#[utoipa::path(
    get,
    path = "/api/orders/myorders",
    tag = "Orders",
    responses(
        (status = 200, description = "Orders of the caller, newest first", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid token", body = crate::models::MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_orders(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let orders = order_service::my_orders(store.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// 🔒 GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ObjectId (hex)")),
    responses(
        (status = 200, description = "Order owned by the caller (any order for admins)", body = OrderResponse),
        (status = 400, description = "Malformed id", body = crate::models::MessageResponse),
        (status = 401, description = "Missing or invalid token", body = crate::models::MessageResponse),
        (status = 404, description = "Order not found", body = crate::models::MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::get_order(store.get_ref(), &user, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}
