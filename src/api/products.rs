use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    database::Store,
    models::{CreateProductRequest, MessageResponse, ProductResponse, UpdateProductRequest},
    services::{auth_service::Claims, product_service},
    utils::AppError,
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Filtro case-insensitive pelo nome
    pub keyword: Option<String>,
}

fn require_admin(user: &Claims) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not authorized as an admin".to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Catalogue, newest first", body = [ProductResponse])
    )
)]
pub async fn list_products(
    store: web::Data<dyn Store>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse, AppError> {
    let products = product_service::list_products(store.get_ref(), query.keyword.as_deref()).await?;
    Ok(HttpResponse::Ok().json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (hex)")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 400, description = "Malformed id", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    )
)]
pub async fn get_product(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product = product_service::get_product(store.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// 🔒 POST /api/products (admin)
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Blank name or negative price", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 403, description = "Not an admin", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    let product = product_service::create_product(store.get_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

/// 🔒 PUT /api/products/{id} (admin)
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (hex)")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Malformed id or invalid field", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 403, description = "Not an admin", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    let product =
        product_service::update_product(store.get_ref(), &path.into_inner(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// 🔒 DELETE /api/products/{id} (admin)
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId (hex)")),
    responses(
        (status = 200, description = "Product removed", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 403, description = "Not an admin", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;
    product_service::delete_product(store.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Product removed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{app, status_of, token_for};
    use crate::database::MemoryStore;
    use actix_web::test;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_admin_crud_and_public_reads() {
        let store = Arc::new(MemoryStore::new());
        let admin = token_for(&store, "admin@flickrly.com", true).await;
        let app = test::init_service(app(store.clone())).await;

        let req = test::TestRequest::post()
            .uri("/api/products")
            .insert_header(("Authorization", format!("Bearer {}", admin)))
            .set_json(json!({
                "name": "Lavender Bliss",
                "description": "Hand-poured soy wax",
                "price": 499,
                "image": "/images/lavender.jpg"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let created: ProductResponse = test::read_body_json(resp).await;

        let req = test::TestRequest::get().uri("/api/products?keyword=LAV").to_request();
        let listed: Vec<ProductResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, vec![created.clone()]);

        let req = test::TestRequest::put()
            .uri(&format!("/api/products/{}", created.id))
            .insert_header(("Authorization", format!("Bearer {}", admin)))
            .set_json(json!({ "price": 549 }))
            .to_request();
        let updated: ProductResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.price, Decimal::from(549));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/products/{}", created.id))
            .insert_header(("Authorization", format!("Bearer {}", admin)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::get()
            .uri(&format!("/api/products/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: MessageResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Product not found");
    }

    #[actix_web::test]
    async fn test_writes_need_admin_token() {
        let store = Arc::new(MemoryStore::new());
        let customer = token_for(&store, "customer@flickrly.com", false).await;
        let app = test::init_service(app(store)).await;
        let payload = json!({ "name": "Rose Garden", "price": 350 });

        let req = test::TestRequest::post()
            .uri("/api/products")
            .set_json(payload.clone())
            .to_request();
        assert_eq!(status_of(&app, req).await, 401);

        let req = test::TestRequest::post()
            .uri("/api/products")
            .insert_header(("Authorization", format!("Bearer {}", customer)))
            .set_json(payload)
            .to_request();
        assert_eq!(status_of(&app, req).await, 403);
    }

    #[actix_web::test]
    async fn test_malformed_id_is_400() {
        let app = test::init_service(app(Arc::new(MemoryStore::new()))).await;

        let req = test::TestRequest::get().uri("/api/products/not-an-id").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }
}
