use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use luna_edge::{router, DirAssets, EdgeState, MemoryAssets};
use tempfile::tempdir;
use tower::ServiceExt;

const INDEX: &str = "<!doctype html><title data-i18n=\"page.title\">Luna</title>";

fn assets() -> MemoryAssets {
    MemoryAssets::new()
        .with("/index.html", "text/html; charset=utf-8", INDEX)
        .with("/app.js", "text/javascript", "console.log('luna')")
}

fn app(assets: MemoryAssets) -> Router {
    router(EdgeState::new(assets), 16)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn missing_page_falls_back_to_index() {
    let assets = assets();
    let response = app(assets.clone())
        .oneshot(get("/missing-page"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(body_string(response).await, INDEX);
    assert_eq!(assets.fetched(), vec!["/missing-page", "/index.html"]);
}

#[tokio::test]
async fn api_misses_pass_through() {
    let assets = assets();
    let response = app(assets.clone())
        .oneshot(get("/api/stats"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::REFERRER_POLICY], "no-referrer");
    assert_eq!(body_string(response).await, "Not Found");
    assert_eq!(assets.fetched(), vec!["/api/stats"]);
}

#[tokio::test]
async fn static_assets_are_cached_long() {
    let response = app(assets()).oneshot(get("/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=604800, immutable"
    );

    let response = app(assets()).oneshot(get("/index.html")).await.unwrap();
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
}

#[tokio::test]
async fn missing_script_keeps_long_cache_of_original_path() {
    let response = app(assets()).oneshot(get("/gone.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=604800, immutable"
    );
    assert_eq!(body_string(response).await, INDEX);
}

#[tokio::test]
async fn missing_index_leaves_the_404() {
    let assets = MemoryAssets::new();
    let response = app(assets.clone()).oneshot(get("/nowhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(assets.fetched(), vec!["/nowhere", "/index.html"]);
}

#[tokio::test]
async fn directory_assets_serve_files_and_fallback() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css").join("site.css"), "body{}").unwrap();
    let app = || router(EdgeState::new(DirAssets::new(dir.path())), 16);

    let response = app().oneshot(get("/css/site.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=604800, immutable"
    );
    assert_eq!(body_string(response).await, "body{}");

    let response = app().oneshot(get("/docs/getting-started")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(body_string(response).await, INDEX);
}

#[tokio::test]
async fn fallback_keeps_method_and_headers() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX).unwrap();
    let app = || router(EdgeState::new(DirAssets::new(dir.path())), 16);

    let head = Request::builder()
        .method(Method::HEAD)
        .uri("/missing-page")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(head).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(body_string(response).await, "");

    let ranged = Request::builder()
        .uri("/missing-page")
        .header(header::RANGE, "bytes=0-8")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(ranged).await.unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(body_string(response).await, &INDEX[..9]);
}
