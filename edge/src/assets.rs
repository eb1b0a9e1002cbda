//! Static-asset origins the edge handler delegates to.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::async_trait;
use axum::body::{boxed, Body, BoxBody, Full};
use axum::http::{header, HeaderValue, Request, Response, StatusCode};
use tower::ServiceExt;
use tower_http::services::ServeDir;

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Answer `request` from the store. Missing assets come back as 404.
    async fn fetch(&self, request: Request<Body>) -> Response<BoxBody>;
}

/// Serves files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssets {
    serve: ServeDir,
}

impl DirAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            serve: ServeDir::new(root),
        }
    }
}

#[async_trait]
impl AssetStore for DirAssets {
    async fn fetch(&self, request: Request<Body>) -> Response<BoxBody> {
        match self.serve.clone().oneshot(request).await {
            Ok(response) => response.map(boxed),
            Err(never) => match never {},
        }
    }
}

/// Fixed set of in-memory assets keyed by path. Records every path fetched.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, (&'static str, Vec<u8>)>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        self.files
            .insert(path.to_string(), (content_type, body.into()));
        self
    }

    /// Paths requested so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        match self.fetched.lock() {
            Ok(f) => f.clone(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn fetch(&self, request: Request<Body>) -> Response<BoxBody> {
        let path = request.uri().path().to_string();
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(path.clone());
        }
        let (status, content_type, body) = match self.files.get(&path) {
            Some((content_type, body)) => (StatusCode::OK, *content_type, body.clone()),
            None => (
                StatusCode::NOT_FOUND,
                "text/plain; charset=utf-8",
                b"Not Found".to_vec(),
            ),
        };
        let mut response = Response::new(boxed(Full::from(body)));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        response
    }
}
