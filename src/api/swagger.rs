use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flickrly Storefront API",
        version = "1.0.0",
        description = "Candle storefront backend.\n\n**Authentication:** order, profile and product write endpoints require a JWT Bearer token. Product writes also require an admin account.",
        contact(
            name = "Flickrly Team",
            email = "support@flickrly.com"
        )
    ),
    paths(
        crate::api::health::health_check,

        // Catalogue
        crate::api::products::list_products,
        crate::api::products::get_product,
        crate::api::products::create_product,
        crate::api::products::update_product,
        crate::api::products::delete_product,

        // Users
        crate::api::users::register,
        crate::api::users::login,
        crate::api::users::profile,

        // Orders
        crate::api::orders::create_order,
        crate::api::orders::my_orders,
        crate::api::orders::get_order,

        // Newsletter
        crate::api::subscriptions::subscribe,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::MessageResponse,
            crate::models::ProductResponse,
            crate::models::CreateProductRequest,
            crate::models::UpdateProductRequest,
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::UserResponse,
            crate::models::AuthResponse,
            crate::models::IncomingOrderItem,
            crate::models::CreateOrderRequest,
            crate::models::OrderItemResponse,
            crate::models::OrderResponse,
            crate::models::SubscribeRequest,
            crate::models::SubscribeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service and database status"),
        (name = "Products", description = "Candle catalogue"),
        (name = "Users", description = "Registration and login"),
        (name = "Orders", description = "Checkout and order history"),
        (name = "Subscriptions", description = "Newsletter sign-up"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/users or /api/users/login"))
                        .build()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_storefront_paths() {
        let doc = ApiDoc::openapi();

        for path in [
            "/health",
            "/api/products",
            "/api/products/{id}",
            "/api/users",
            "/api/users/login",
            "/api/users/profile",
            "/api/orders",
            "/api/orders/myorders",
            "/api/orders/{id}",
            "/api/subscribe",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let product = &doc.paths.paths["/api/products/{id}"];
        assert!(product.get.is_some() && product.put.is_some() && product.delete.is_some());
        assert!(doc.paths.paths["/api/products"].post.is_some());
        assert!(doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false));
    }
}
