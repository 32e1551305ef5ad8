pub mod health;
pub mod orders;
pub mod products;
pub mod spa;
pub mod subscriptions;
pub mod swagger;
pub mod users;

use actix_web::{guard, web, HttpRequest, HttpResponse};

use crate::middleware::AuthMiddleware;
use crate::models::MessageResponse;
use crate::utils::AppError;

/// Registers every `/api` route plus `/health`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        // Products: leitura pública, escrita só para admin
        .service(
            web::scope("/api/products")
                .service(
                    web::resource("")
                        .guard(guard::Get())
                        .route(web::get().to(products::list_products)),
                )
                .service(
                    web::resource("")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(products::create_product)),
                )
                .service(
                    web::resource("/{id}")
                        .guard(guard::Get())
                        .route(web::get().to(products::get_product)),
                )
                .service(
                    web::resource("/{id}")
                        .wrap(AuthMiddleware)
                        .route(web::put().to(products::update_product))
                        .route(web::delete().to(products::delete_product)),
                ),
        )
        .service(
            web::scope("/api/users")
                .route("", web::post().to(users::register))
                .route("/login", web::post().to(users::login))
                .service(
                    web::resource("/profile")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::profile)),
                ),
        )
        // Orders: todas exigem JWT
        .service(
            web::scope("/api/orders")
                .wrap(AuthMiddleware)
                .route("", web::post().to(orders::create_order))
                .route("/myorders", web::get().to(orders::my_orders))
                .route("/{id}", web::get().to(orders::get_order)),
        )
        .service(
            web::scope("/api/subscribe")
                .route("", web::post().to(subscriptions::subscribe)),
        );
}

/// Malformed JSON bodies answer 400 with the usual `{ message }` shape
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Fallback for anything no route matched
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new(format!("Not Found - {}", req.path())))
}
