//! HTTP server for detail pages

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::ContentSource;
use crate::meta::MetadataGenerator;
use crate::page::{render_document, render_error, render_not_found, PageRenderer};
use crate::templates::TemplateRenderer;
use crate::wordpress::ImageFetcher;
use crate::WpFront;

/// Server state
struct ServerState {
    config: SiteConfig,
    source: Arc<dyn ContentSource>,
    templates: TemplateRenderer,
    /// Fetches allow-listed remote images for `/_image`
    images: ImageFetcher,
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    url: String,
}

/// Build the application router
pub fn router(site: &WpFront) -> Result<Router> {
    site.config.validate()?;

    let state = Arc::new(ServerState {
        config: site.config.clone(),
        source: site.source(),
        templates: TemplateRenderer::new()?,
        images: ImageFetcher::from_config(&site.config),
    });

    let detail_route = format!("/{}/:slug", site.config.route_prefix.trim_matches('/'));

    Ok(Router::new()
        .route(&detail_route, get(vehicle_handler))
        .route(&site.config.admin_path, get(admin_handler))
        .route("/_image", get(image_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(site: &WpFront, ip: &str, port: u16) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Detail page: metadata and body from the same slug, lookups on the blocking pool
async fn vehicle_handler(
    Path(slug): Path<String>,
    State(state): State<Arc<ServerState>>,
    uri: Uri,
) -> Response {
    let path = uri.path().to_string();
    let task_state = state.clone();

    let result = tokio::task::spawn_blocking(move || {
        let source = task_state.source.as_ref();
        let metadata = MetadataGenerator::new(&task_state.config, source).generate(&slug);
        let page = PageRenderer::new(&task_state.config, source).assemble(&slug)?;
        Ok::<_, crate::error::FetchError>((metadata, page))
    })
    .await;

    match result {
        Ok(Ok((metadata, Some(page)))) => {
            match render_document(&state.templates, &state.config, &metadata, &page) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!("Failed to render {}: {}", path, e);
                    error_response(&state)
                }
            }
        }
        Ok(Ok((_, None))) => not_found_response(&state, &path),
        Ok(Err(e)) => {
            tracing::error!("Failed to load {}: {}", path, e);
            error_response(&state)
        }
        Err(e) => {
            tracing::error!("Render task for {} failed: {}", path, e);
            error_response(&state)
        }
    }
}

/// Permanent redirect to the CMS admin
async fn admin_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    Redirect::permanent(&state.config.admin_destination())
}

/// Proxy for remote images matching the configured patterns
async fn image_handler(
    Query(query): Query<ImageQuery>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    if !state.images.allows(&query.url) {
        tracing::warn!("Rejected image URL {}", query.url);
        return (StatusCode::BAD_REQUEST, "URL is not allowed").into_response();
    }

    let task_state = state.clone();
    let url = query.url.clone();
    let result = tokio::task::spawn_blocking(move || task_state.images.fetch(&url)).await;

    match result {
        Ok(Ok((content_type, bytes))) => {
            let content_type =
                content_type.unwrap_or_else(|| "application/octet-stream".to_string());
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Ok(Err(e)) => {
            tracing::warn!("Failed to fetch image {}: {}", query.url, e);
            (StatusCode::BAD_GATEWAY, "Upstream image unavailable").into_response()
        }
        Err(e) => {
            tracing::error!("Image task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn fallback_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    not_found_response(&state, uri.path())
}

fn not_found_response(state: &ServerState, path: &str) -> Response {
    match render_not_found(&state.templates, &state.config, path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn error_response(state: &ServerState) -> Response {
    match render_error(&state.templates, &state.config) {
        Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::MUSTANG_SNAPSHOT;
    use crate::content::FixtureSource;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get as get_route;
    use tower::ServiceExt;

    fn test_site() -> WpFront {
        let mut config = SiteConfig::default();
        config.site_domain = "https://cars.example.com".to_string();
        config.wordpress_url = "https://cms.example.com".to_string();
        config.wordpress_hostname = "cms.example.com".to_string();
        config.finalize();
        let source = FixtureSource::from_json(MUSTANG_SNAPSHOT).unwrap();
        WpFront::with_source(config, Arc::new(source))
    }

    async fn get(uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        get_from(&test_site(), uri).await
    }

    async fn get_from(site: &WpFront, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let app = router(site).unwrap();
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_vehicle_page() {
        let (status, _, body) = get("/vehicles/classic-mustang").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<meta property="og:url" content="https://cars.example.com/vehicles/classic-mustang">"#));
        assert!(body.contains("Published January 15, 2024 by"));
        assert!(body.contains(r#"href="/vehicles/?category=5""#));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let (status, _, body) = get("/vehicles/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("/vehicles/missing"));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_500() {
        let (status, _, body) = get("/vehicles/no-picture").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Something went wrong"));
    }

    #[tokio::test]
    async fn test_admin_redirect() {
        let (status, headers, _) = get("/admin").await;
        assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            headers.get(header::LOCATION).unwrap(),
            "https://cms.example.com/wp-admin"
        );
    }

    #[tokio::test]
    async fn test_image_not_allowed() {
        let (status, _, _) = get("/_image?url=https%3A%2F%2Fevil.example.com%2Fa.jpg").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, _) = get("/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Serve `app` on an ephemeral local port
    async fn spawn_upstream(app: Router) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        port
    }

    /// Image origin on one port, a private service on another; only the
    /// origin's `/img/**` is allow-listed
    async fn image_site() -> (WpFront, u16) {
        let private =
            spawn_upstream(Router::new().route("/internal", get_route(|| async { "INTERNAL-DATA" })))
                .await;

        let origin = Router::new()
            .route(
                "/img/ok.png",
                get_route(|| async {
                    ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G'])
                }),
            )
            .route(
                "/img/hop.png",
                get_route(|| async { (StatusCode::FOUND, [(header::LOCATION, "/img/ok.png")]) }),
            )
            .route(
                "/img/a.jpg",
                get_route(move || async move {
                    let target = format!("http://127.0.0.1:{}/internal", private);
                    (StatusCode::FOUND, [(header::LOCATION, target)])
                }),
            );
        let origin_port = spawn_upstream(origin).await;

        let mut config = SiteConfig::default();
        config.images.remote_patterns.push(crate::config::RemotePattern {
            protocol: "http".to_string(),
            hostname: "127.0.0.1".to_string(),
            port: origin_port.to_string(),
            pathname: "/img/**".to_string(),
        });
        config.finalize();
        let source = FixtureSource::from_json(MUSTANG_SNAPSHOT).unwrap();
        (WpFront::with_source(config, Arc::new(source)), origin_port)
    }

    fn image_uri(url: &str) -> String {
        format!("/_image?url={}", crate::helpers::encode_query_value(url))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_image_proxy_passes_content_type() {
        let (site, port) = image_site().await;
        let url = format!("http://127.0.0.1:{}/img/ok.png", port);
        let (status, headers, _) = get_from(&site, &image_uri(&url)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "image/png");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_image_proxy_follows_allowed_redirect() {
        let (site, port) = image_site().await;
        let url = format!("http://127.0.0.1:{}/img/hop.png", port);
        let (status, headers, _) = get_from(&site, &image_uri(&url)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "image/png");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_image_proxy_refuses_redirect_off_allow_list() {
        let (site, port) = image_site().await;
        let url = format!("http://127.0.0.1:{}/img/a.jpg", port);
        let (status, _, body) = get_from(&site, &image_uri(&url)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.contains("INTERNAL-DATA"));
    }

    #[test]
    fn test_router_rejects_bad_admin_path() {
        let mut site = test_site();
        site.config.admin_path = "admin".to_string();
        assert!(router(&site).is_err());
    }

    #[test]
    fn test_router_accepts_normalized_admin_path() {
        let mut site = test_site();
        site.config.admin_path = "admin".to_string();
        site.config.finalize();
        assert!(router(&site).is_ok());
    }
}
