use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use flickrly::api::{self, spa::FrontendAssets};
use flickrly::config::{Config, StoreKind};
use flickrly::database::{MemoryStore, MongoDB, Store};
use flickrly::middleware::SecurityHeaders;
use flickrly::seeds::products_seed;
use flickrly::services::auth_service::TokenService;

fn build_cors(config: &Config) -> Cors {
    let cors = if config.allows_any_origin() {
        Cors::default().allow_any_origin()
    } else {
        config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CACHE_CONTROL,
            actix_web::http::header::PRAGMA,
        ])
        .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

async fn connect_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    match (config.store, config.mongo_uri.as_deref()) {
        (StoreKind::Mongo, Some(uri)) => {
            let db = MongoDB::new(uri).await.map_err(io::Error::other)?;
            log::info!("✅ MongoDB connected successfully");
            Ok(Arc::new(db))
        }
        (StoreKind::Mongo, None) => Err(io::Error::other("MONGO_URI must be set")),
        (StoreKind::Memory, _) => {
            log::warn!("⚠️ Using in-memory store: data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting Flickrly Storefront...");

    let store = connect_store(&config).await?;

    if config.seed_products {
        products_seed::seed_default_products(store.as_ref()).await;
    }

    let store_data: web::Data<dyn Store> = web::Data::from(store);
    let tokens = web::Data::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_days));
    let frontend = config
        .production
        .then(|| web::Data::new(FrontendAssets::new(config.frontend_dir.clone())));

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    match &frontend {
        Some(assets) => log::info!("🖼️ Serving frontend from {}", assets.root().display()),
        None => log::info!("🛠️ Development mode: frontend is served separately"),
    }

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();
        let frontend = frontend.clone();

        App::new()
            .app_data(store_data.clone())
            .app_data(tokens.clone())
            .wrap(build_cors(&config))
            .wrap(SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
            .configure(move |cfg| match frontend {
                Some(assets) => {
                    cfg.app_data(assets);
                }
                None => {
                    cfg.route("/", web::get().to(api::spa::api_banner));
                }
            })
            .default_service(web::to(api::spa::spa_fallback))
    })
    .bind(bind_address)?
    .run()
    .await
}
