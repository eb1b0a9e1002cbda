use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, BoxBody};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri, Version};
use axum::Router;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tracing::{debug, error, info};

use crate::assets::{AssetStore, DirAssets};
use crate::config::EdgeConfig;

/// Entry document served for unmatched routes.
pub const INDEX_PATH: &str = "/index.html";
/// Routes under this prefix never fall back to the entry document.
pub const API_PREFIX: &str = "/api/";

pub const LONG_CACHE: &str = "public, max-age=604800, immutable";
pub const NO_CACHE: &str = "no-cache";

static STATIC_ASSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(css|js|svg|png|jpg|jpeg|gif|webp|ico)$").expect("invalid asset pattern")
});

#[derive(Clone)]
pub struct EdgeState {
    assets: Arc<dyn AssetStore>,
}

impl EdgeState {
    pub fn new(assets: impl AssetStore + 'static) -> Self {
        Self {
            assets: Arc::new(assets),
        }
    }
}

/// `Cache-Control` value for a request path.
pub fn cache_control_for(path: &str) -> &'static str {
    if STATIC_ASSET.is_match(path) {
        LONG_CACHE
    } else {
        NO_CACHE
    }
}

/// Request for the entry document carrying the original method and headers.
struct Fallback {
    method: Method,
    version: Version,
    headers: HeaderMap,
}

impl Fallback {
    fn capture(request: &Request<Body>) -> Self {
        Self {
            method: request.method().clone(),
            version: request.version(),
            headers: request.headers().clone(),
        }
    }

    fn into_request(self) -> Request<Body> {
        let mut request = Request::new(Body::empty());
        *request.method_mut() = self.method;
        *request.uri_mut() = Uri::from_static(INDEX_PATH);
        *request.version_mut() = self.version;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Serve `request` from the asset store.
///
/// A 404 outside [`API_PREFIX`] is retried once against [`INDEX_PATH`].
/// Every response gets the security headers and a cache policy chosen by the
/// original request path.
pub async fn serve_asset(State(state): State<EdgeState>, request: Request<Body>) -> Response<BoxBody> {
    let path = request.uri().path().to_string();
    let fallback = Fallback::capture(&request);

    let mut response = state.assets.fetch(request).await;
    if response.status() == StatusCode::NOT_FOUND && !path.starts_with(API_PREFIX) {
        debug!("SPA fallback for {path}");
        response = state.assets.fetch(fallback.into_request()).await;
    }
    debug!("{path} -> {}", response.status());
    with_site_headers(&path, response)
}

fn with_site_headers(path: &str, response: Response<BoxBody>) -> Response<BoxBody> {
    let (mut parts, body) = response.into_parts();
    let headers = &mut parts.headers;
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control_for(path)),
    );
    Response::from_parts(parts, body)
}

pub fn router(state: EdgeState, max_concurrent_requests: usize) -> Router {
    Router::new()
        .fallback(serve_asset)
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .with_state(state)
}

pub async fn run(cfg: EdgeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let assets = DirAssets::new(&cfg.assets_dir);
    let app = router(EdgeState::new(assets), cfg.max_concurrent_requests);

    let addr: SocketAddr = cfg.address().parse().map_err(|e| {
        error!("invalid address: {e}");
        e
    })?;
    info!("Serving {} on {}", cfg.assets_dir, addr);
    let ctrl_c = signal::ctrl_c();
    axum::Server::try_bind(&addr)
        .map_err(|e| {
            error!("bind {addr}: {e}");
            e
        })?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async move {
            if let Err(e) = ctrl_c.await {
                error!("failed to listen for shutdown signal: {e}");
            }
        })
        .await
        .map_err(|e| {
            error!("server error: {e}");
            e
        })?;
    Ok(())
}
