//! Serving the bundled React build in production.
//!
//! Anything that is not an API route and not a real file under the
//! frontend directory gets `index.html`, so client-side routes such as
//! `/cart` survive a page reload.

use std::path::{Component, Path, PathBuf};

use actix_web::{http::Method, web, HttpRequest, HttpResponse};

use super::not_found;

#[derive(Debug, Clone)]
pub struct FrontendAssets {
    root: PathBuf,
}

impl FrontendAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> PathBuf {
        self.root.join("index.html")
    }

    /// Maps a request path onto a file under the root, refusing anything
    /// that would climb out of it.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        let mut resolved = self.root.clone();

        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

async fn read_file(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => tokio::fs::read(path).await.ok(),
        _ => None,
    }
}

/// Development root: the API answers with a plain banner
pub async fn api_banner() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Flickrly API is running...")
}

/// Default service for the whole app. Without registered `FrontendAssets`
/// (development) every unmatched request is a JSON 404.
pub async fn spa_fallback(req: HttpRequest) -> HttpResponse {
    let assets = match req.app_data::<web::Data<FrontendAssets>>() {
        Some(assets) => assets.clone(),
        None => return not_found(req).await,
    };
    if req.method() != Method::GET || req.path().starts_with("/api") {
        return not_found(req).await;
    }

    if let Some(path) = assets.resolve(req.path()) {
        if let Some(body) = read_file(&path).await {
            return HttpResponse::Ok().content_type(content_type(&path)).body(body);
        }
    }

    let index = assets.index();
    match read_file(&index).await {
        Some(body) => HttpResponse::Ok().content_type(content_type(&index)).body(body),
        None => {
            log::error!("❌ Frontend bundle missing: {}", index.display());
            not_found(req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    fn bundle() -> FrontendAssets {
        let root = std::env::temp_dir().join(format!("flickrly-spa-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("static")).unwrap();
        std::fs::write(root.join("index.html"), "<html>flickrly</html>").unwrap();
        std::fs::write(root.join("static/main.js"), "console.log('candles')").unwrap();
        FrontendAssets::new(root)
    }

    #[::core::prelude::v1::test]
    fn test_resolve_rejects_parent_segments() {
        let assets = FrontendAssets::new("/srv/frontend");

        assert_eq!(
            assets.resolve("/static/main.js"),
            Some(PathBuf::from("/srv/frontend/static/main.js"))
        );
        assert_eq!(assets.resolve("/../etc/passwd"), None);
        assert_eq!(assets.resolve("/static/../../secret"), None);
    }

    #[actix_web::test]
    async fn test_serves_files_and_falls_back_to_index() {
        let assets = bundle();
        let root = assets.root().to_path_buf();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(assets))
                .default_service(web::to(spa_fallback)),
        )
        .await;

        let req = test::TestRequest::get().uri("/static/main.js").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("content-type").unwrap(), "application/javascript");

        let req = test::TestRequest::get().uri("/cart").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "<html>flickrly</html>".as_bytes());

        let req = test::TestRequest::get().uri("/api/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        std::fs::remove_dir_all(root).ok();
    }

    #[actix_web::test]
    async fn test_without_bundle_everything_is_404() {
        let app = test::init_service(App::new().default_service(web::to(spa_fallback))).await;

        let req = test::TestRequest::get().uri("/cart").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_banner() {
        let app = test::init_service(App::new().route("/", web::get().to(api_banner))).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "Flickrly API is running...".as_bytes());
    }
}
