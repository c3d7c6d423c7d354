//! WarpDeck HTTP API
//!
//! HTTP layer for WarpDeck, built with Axum.
//!
//! # Endpoints
//!
//! ## Settings
//! - `GET /api/settings` - Global settings
//! - `PUT /api/settings` - Partial update
//! - `GET /api/settings/export` - Zip export
//! - `POST /api/settings/import` - Zip import
//!
//! ## Dashboards
//! - `GET /api/dashboards` - All dashboards
//! - `POST /api/dashboards` - Create a dashboard
//! - `POST /api/dashboards/import` - Import a dashboard
//! - `POST /api/dashboards/reorder` - Reorder the index
//! - `POST /api/dashboards/repair` - Repair the default slug
//! - `GET /api/dashboards/:slug` - Get a dashboard
//! - `PUT /api/dashboards/:slug` - Update a dashboard
//! - `DELETE /api/dashboards/:slug` - Delete a dashboard
//! - `POST /api/dashboards/:slug/refresh` - Re-acquire favicons
//!
//! ## Links
//! - `POST /api/dashboards/:slug/links` - Add a link
//! - `PUT /api/dashboards/:slug/links/:link_id` - Update a link
//! - `DELETE /api/dashboards/:slug/links/:link_id` - Delete a link
//!
//! ## Files
//! - `POST /api/upload/thumbnail`, `POST /api/upload/background` - Image uploads
//! - `GET /api/uploads/*`, `GET /api/images/*` - Stored images
//! - `GET /api/favicon?url=` - Redirect to the origin's favicon
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! Any other path serves the client bundle, falling back to `index.html`.
//!
//! # Example
//!
//! ```rust,ignore
//! use warpdeck::api::{serve, ApiConfig, AppState};
//! use warpdeck::favicon::{FaviconFetcher, FetcherConfig};
//! use warpdeck::store::{FileStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store_config = StoreConfig::new("./data");
//!     let images_dir = store_config.images_dir();
//!     let store = Arc::new(FileStore::open(store_config).await?);
//!     let favicons = Arc::new(FaviconFetcher::new(FetcherConfig {
//!         images_dir,
//!         ..Default::default()
//!     })?);
//!     let config = ApiConfig::default().with_client_dir("./warpdeck-ui/dist");
//!
//!     let state = AppState::new(store, favicons, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, Uri},
    routing::{get, post, put},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Allowance for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let store_config = state.store.config().clone();
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    let api_routes = Router::new()
        // Settings routes
        .route(
            "/settings",
            get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        .route("/settings/export", get(routes::settings::export_settings))
        .route("/settings/import", post(routes::settings::import_settings))
        // Dashboard routes
        .route(
            "/dashboards",
            get(routes::dashboards::list_dashboards).post(routes::dashboards::create_dashboard),
        )
        .route("/dashboards/import", post(routes::dashboards::import_dashboard))
        .route("/dashboards/reorder", post(routes::dashboards::reorder_dashboards))
        .route("/dashboards/repair", post(routes::dashboards::repair_default))
        .route(
            "/dashboards/:slug",
            get(routes::dashboards::get_dashboard)
                .put(routes::dashboards::update_dashboard)
                .delete(routes::dashboards::delete_dashboard),
        )
        .route("/dashboards/:slug/refresh", post(routes::dashboards::refresh_dashboard))
        // Link routes
        .route("/dashboards/:slug/links", post(routes::links::add_link))
        .route(
            "/dashboards/:slug/links/:link_id",
            put(routes::links::update_link).delete(routes::links::delete_link),
        )
        // Upload routes
        .route("/upload/thumbnail", post(routes::upload::upload_thumbnail))
        .route("/upload/background", post(routes::upload::upload_background))
        .route("/favicon", get(routes::utils::favicon_redirect))
        // Stored images
        .nest("/uploads", cached_files(store_config.uploads_dir()))
        .nest("/images", cached_files(store_config.images_dir()))
        .fallback(api_not_found)
        .layer(DefaultBodyLimit::max(body_limit));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let client_dir = state.config.client_dir.clone();

    // Create shared state
    let shared_state = Arc::new(state);

    let router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    let router = match client_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Static files with a one-day cache lifetime and JSON 404s
fn cached_files<S>(dir: PathBuf) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        ))
        .service(ServeDir::new(dir).not_found_service(api_not_found.into_service()));

    Router::new().fallback_service(files)
}

async fn api_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Start the server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("WarpDeck listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("WarpDeck shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favicon::{FaviconFetcher, FetcherConfig, IconStrategy};
    use crate::store::{FileStore, StoreConfig};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::io::{Cursor, Read};
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    /// Favicon lookups against a closed local port fail immediately
    fn offline_fetcher(images_dir: PathBuf) -> FetcherConfig {
        FetcherConfig {
            images_dir,
            request_timeout: Duration::from_millis(500),
            page_timeout: Duration::from_millis(500),
            proxy_template: "http://127.0.0.1:1/ip3/{host}.ico".to_string(),
            ..Default::default()
        }
    }

    async fn create_app(
        dir: &std::path::Path,
        fetcher: impl FnOnce(PathBuf) -> FetcherConfig,
        client_dir: Option<PathBuf>,
    ) -> Router {
        let store_config = StoreConfig::new(dir);
        let images_dir = store_config.images_dir();
        let store = Arc::new(FileStore::open(store_config).await.unwrap());
        let favicons = Arc::new(FaviconFetcher::new(fetcher(images_dir)).unwrap());

        let mut api_config = ApiConfig::default();
        api_config.client_dir = client_dir;

        build_router(AppState::new(store, favicons, api_config))
    }

    async fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let router = create_app(dir.path(), offline_fetcher, None).await;
        (router, dir)
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body_bytes(response).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(uri: &str, field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "warpdeck-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn create_dashboard(app: &Router, title: &str, slug: &str) -> Value {
        let (status, body) = send(
            app,
            json_request("POST", "/api/dashboards", json!({"title": title, "slug": slug})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn slugs(app: &Router) -> Vec<String> {
        let (_, body) = send(app, get("/api/dashboards")).await;
        body.as_array()
            .unwrap()
            .iter()
            .map(|d| d["slug"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app().await;
        let response = app.oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _dir) = create_test_app().await;
        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["dashboards"], 1);
    }

    #[tokio::test]
    async fn test_default_settings() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = send(&app, get("/api/settings")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"defaultTheme": "dark", "defaultDashboardSlug": "", "dashboards": []}));
    }

    #[tokio::test]
    async fn test_update_settings_is_partial() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;

        let (status, body) =
            send(&app, json_request("PUT", "/api/settings", json!({"defaultTheme": "light"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaultTheme"], "light");
        assert_eq!(body["dashboards"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_dashboard_and_list() {
        let (app, _dir) = create_test_app().await;

        let created = create_dashboard(&app, "Home", "home").await;
        assert_eq!(created["layout"], json!({"columns": 4, "cardSize": "md", "gutter": 12}));
        assert_eq!(created["links"], json!([]));

        assert_eq!(slugs(&app).await, vec!["home"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected_case_insensitively() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/dashboards", json!({"title": "Again", "slug": "HOME"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "DUPLICATE_SLUG");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_missing_title_is_rejected() {
        let (app, _dir) = create_test_app().await;

        let (status, body) =
            send(&app, json_request("POST", "/api/dashboards", json!({"slug": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Title and slug are required");
    }

    #[tokio::test]
    async fn test_unknown_dashboard_is_404() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = send(&app, get("/api/dashboards/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "DASHBOARD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_deleting_default_reassigns_it() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;
        create_dashboard(&app, "Work", "work").await;
        send(&app, json_request("PUT", "/api/settings", json!({"defaultDashboardSlug": "home"}))).await;

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/dashboards/home")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (_, settings) = send(&app, get("/api/settings")).await;
        assert_eq!(settings["defaultDashboardSlug"], "work");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/dashboards/work")
            .body(Body::empty())
            .unwrap();
        send(&app, delete).await;

        let (_, settings) = send(&app, get("/api/settings")).await;
        assert_eq!(settings["defaultDashboardSlug"], "");
    }

    #[tokio::test]
    async fn test_rename_moves_slug() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;

        let (status, body) = send(
            &app,
            json_request("PUT", "/api/dashboards/home", json!({"slug": "start", "title": "Start"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "start");

        let (status, _) = send(&app, get("/api/dashboards/home")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, get("/api/dashboards/start")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Start");

        let (_, settings) = send(&app, get("/api/settings")).await;
        assert_eq!(settings["dashboards"][0]["slug"], "start");
    }

    #[tokio::test]
    async fn test_reorder_permutation_and_omission() {
        let (app, _dir) = create_test_app().await;
        let a = create_dashboard(&app, "A", "a").await;
        let b = create_dashboard(&app, "B", "b").await;
        let c = create_dashboard(&app, "C", "c").await;

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/dashboards/reorder",
                json!({"dashboardIds": [c["id"], a["id"], b["id"]]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(slugs(&app).await, vec!["c", "a", "b"]);

        send(
            &app,
            json_request("POST", "/api/dashboards/reorder", json!({"dashboardIds": [b["id"], a["id"]]})),
        )
        .await;
        assert_eq!(slugs(&app).await, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_repair_endpoint() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "A", "a").await;
        send(&app, json_request("PUT", "/api/settings", json!({"defaultDashboardSlug": "gone"}))).await;

        let (status, body) = send(&app, json_request("POST", "/api/dashboards/repair", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["repaired"], true);
        assert_eq!(body["oldSlug"], "gone");
        assert_eq!(body["newSlug"], "a");

        let (_, body) = send(&app, json_request("POST", "/api/dashboards/repair", json!({}))).await;
        assert_eq!(body["repaired"], false);
    }

    #[tokio::test]
    async fn test_link_without_reachable_favicon_still_created() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;

        let (status, link) = send(
            &app,
            json_request(
                "POST",
                "/api/dashboards/home/links",
                json!({"label": "Local", "url": "http://127.0.0.1:1/"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(link.get("thumbnail").is_none());
        assert!(link.get("favicon").is_none());
        assert_eq!(link["gridColumns"], 1);
        assert_eq!(link["openInNewTab"], false);
    }

    #[tokio::test]
    async fn test_link_update_and_delete() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;

        let (_, link) = send(
            &app,
            json_request(
                "POST",
                "/api/dashboards/home/links",
                json!({"label": "Docs", "url": "http://127.0.0.1:1/", "thumbnail": "/api/uploads/a.png"}),
            ),
        )
        .await;
        let uri = format!("/api/dashboards/home/links/{}", link["id"].as_str().unwrap());

        let (status, updated) = send(
            &app,
            json_request("PUT", &uri, json!({"label": "Docs.rs", "gridColumns": 2, "thumbnail": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["label"], "Docs.rs");
        assert_eq!(updated["gridColumns"], 2);
        assert!(updated.get("thumbnail").is_none());

        let (status, _) = send(&app, json_request("PUT", &uri, json!({"gridColumns": 0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let delete = Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::OK);

        let delete = Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap();
        let (status, body) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "LINK_NOT_FOUND");

        let (status, _) = send(
            &app,
            json_request("PUT", "/api/dashboards/home/links/not-a-uuid", json!({"label": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_link_to_unknown_dashboard() {
        let (app, _dir) = create_test_app().await;

        let (status, _) = send(
            &app,
            json_request("POST", "/api/dashboards/nope/links", json!({"label": "a", "url": "https://a.example"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_favicon_downloaded_on_create_and_refresh() {
        let icon_app = Router::new().route(
            "/favicon.ico",
            axum::routing::get(|| async { b"icon-bytes".as_slice() }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, icon_app).await.unwrap();
        });

        let dir = tempdir().unwrap();
        let app = create_app(
            dir.path(),
            |images_dir| FetcherConfig {
                strategies: vec![IconStrategy::Conventional],
                ..offline_fetcher(images_dir)
            },
            None,
        )
        .await;
        create_dashboard(&app, "Home", "home").await;

        let url = format!("http://{}/", addr);
        let (status, link) = send(
            &app,
            json_request("POST", "/api/dashboards/home/links", json!({"label": "Local", "url": url})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let favicon = link["favicon"].as_str().unwrap().to_string();
        assert!(favicon.starts_with("images/"));

        let response = app.clone().oneshot(get(&format!("/api/{}", favicon))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=86400"
        );
        assert_eq!(body_bytes(response).await, b"icon-bytes");

        let (status, body) = send(&app, json_request("POST", "/api/dashboards/home/refresh", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["faviconsDownloaded"], 1);
        assert_ne!(body["dashboard"]["links"][0]["favicon"], json!(favicon));
    }

    #[tokio::test]
    async fn test_refresh_without_reachable_icons() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;
        send(
            &app,
            json_request("POST", "/api/dashboards/home/links", json!({"label": "a", "url": "http://127.0.0.1:1/"})),
        )
        .await;

        let (status, body) = send(&app, json_request("POST", "/api/dashboards/home/refresh", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["faviconsDownloaded"], 0);
        assert_eq!(body["message"], "Dashboard refreshed successfully");
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Home", "home").await;
        send(
            &app,
            json_request(
                "POST",
                "/api/dashboards/home/links",
                json!({"label": "Docs", "url": "http://127.0.0.1:1/", "thumbnail": "/api/uploads/d.png", "colorBar": "#ff0000"}),
            ),
        )
        .await;
        let (_, original) = send(&app, get("/api/dashboards/home")).await;

        let response = app.clone().oneshot(get("/api/settings/export")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/zip");
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("warpdeck-export.zip"));
        let zip_bytes = body_bytes(response).await;

        let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        let mut exported = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            if file.name().starts_with("dashboards/") {
                let mut content = String::new();
                file.read_to_string(&mut content).unwrap();
                exported.push(serde_json::from_str::<Value>(&content).unwrap());
            }
        }
        assert_eq!(exported.len(), 1);

        let (status, imported) =
            send(&app, json_request("POST", "/api/dashboards/import", exported[0].clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(imported["slug"], "home-1");
        assert_eq!(imported["title"], original["title"]);
        assert_ne!(imported["id"], original["id"]);

        let original_link = &original["links"][0];
        let imported_link = &imported["links"][0];
        assert_ne!(imported_link["id"], original_link["id"]);
        for field in ["label", "url", "thumbnail", "colorBar", "gridColumns", "openInNewTab"] {
            assert_eq!(imported_link[field], original_link[field], "field {}", field);
        }

        assert_eq!(slugs(&app).await, vec!["home", "home-1"]);
    }

    #[tokio::test]
    async fn test_settings_import_zip() {
        let (source, _source_dir) = create_test_app().await;
        create_dashboard(&source, "Home", "home").await;
        create_dashboard(&source, "Work", "work").await;
        let zip_bytes = body_bytes(source.oneshot(get("/api/settings/export")).await.unwrap()).await;

        let (app, _dir) = create_test_app().await;
        create_dashboard(&app, "Existing", "work").await;

        let (status, body) = send(
            &app,
            multipart_request("/api/settings/import", "file", "export.zip", "application/zip", &zip_bytes),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imported"], 2);
        assert_eq!(body["failed"], 0);

        let mut all = slugs(&app).await;
        all.sort();
        assert_eq!(all, vec!["home", "work", "work-1"]);
    }

    #[tokio::test]
    async fn test_settings_import_rejects_garbage() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = send(
            &app,
            multipart_request("/api/settings/import", "file", "x.zip", "application/zip", b"nope"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ARCHIVE");
    }

    fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_settings_import_malformed_settings_is_400() {
        let (app, _dir) = create_test_app().await;
        let zip_bytes = zip_of(&[("settings.json", &b"{not json"[..])]);

        let (status, body) = send(
            &app,
            multipart_request("/api/settings/import", "file", "x.zip", "application/zip", &zip_bytes),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_ARCHIVE");
    }

    #[tokio::test]
    async fn test_settings_import_ignores_binary_entries() {
        let (app, _dir) = create_test_app().await;
        let zip_bytes = zip_of(&[
            ("dashboards/a.json", &br#"{"title": "A", "slug": "a"}"#[..]),
            ("images/x.png", &[0x89u8, b'P', b'N', b'G', 0xff, 0x00][..]),
        ]);

        let (status, body) = send(
            &app,
            multipart_request("/api/settings/import", "file", "x.zip", "application/zip", &zip_bytes),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imported"], 1);
        assert_eq!(slugs(&app).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_thumbnail_upload_and_serve() {
        let (app, dir) = create_test_app().await;

        let (status, body) = send(
            &app,
            multipart_request("/api/upload/thumbnail", "thumbnail", "logo.png", "image/png", b"png-bytes"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let filename = body["filename"].as_str().unwrap();
        assert!(filename.ends_with(".png"));
        assert_eq!(body["thumbnailUrl"], format!("/api/uploads/{}", filename));
        assert!(dir.path().join("uploads").join(filename).exists());

        let response = app
            .clone()
            .oneshot(get(&format!("/api/uploads/{}", filename)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"png-bytes");

        let (status, _) = send(&app, get("/api/uploads/missing.png")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_background_upload() {
        let (app, dir) = create_test_app().await;

        let (status, body) = send(
            &app,
            multipart_request("/api/upload/background", "image", "bg.jpg", "image/jpeg", b"jpg-bytes"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let filename = body["filename"].as_str().unwrap();
        assert_eq!(body["imageUrl"], format!("/api/images/{}", filename));
        assert!(dir.path().join("images").join(filename).exists());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_images() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = send(
            &app,
            multipart_request("/api/upload/thumbnail", "thumbnail", "a.txt", "text/plain", b"hello"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Only image files are allowed");

        let (status, _) = send(
            &app,
            multipart_request("/api/upload/thumbnail", "other", "a.png", "image/png", b"x"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_favicon_redirect() {
        let (app, _dir) = create_test_app().await;

        let response = app
            .clone()
            .oneshot(get("/api/favicon?url=https%3A%2F%2Fdocs.rs%2Ftokio"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://docs.rs/favicon.ico"
        );

        let (status, _) = send(&app, get("/api/favicon")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/api/favicon?url=javascript%3Aalert(1)")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_api_route_is_json_404() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = send(&app, get("/api/nothing/here")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_spa_fallback() {
        let dir = tempdir().unwrap();
        let client = tempdir().unwrap();
        std::fs::write(client.path().join("index.html"), "<html>warpdeck</html>").unwrap();
        std::fs::write(client.path().join("app.js"), "console.log(1)").unwrap();

        let app = create_app(dir.path(), offline_fetcher, Some(client.path().to_path_buf())).await;

        let response = app.clone().oneshot(get("/settings")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<html>warpdeck</html>");

        let response = app.clone().oneshot(get("/app.js")).await.unwrap();
        assert_eq!(body_bytes(response).await, b"console.log(1)");

        let (status, body) = send(&app, get("/api/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_object());
    }
}
