//! Front-end routes driven through the axum Router

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;
use wdlcontrol::{CancellationToken, ControlError, Folder, FolderSource, SnapshotCache};
use wdldidl::{Container, Item, Resource};
use wdlserver::{ListingState, router};
use wdlupnp::UpnpError;

fn folder(title: &str) -> Folder {
    Folder {
        container: Container {
            id: "64$1".to_string(),
            parent_id: "64".to_string(),
            restricted: Some("1".to_string()),
            searchable: None,
            child_count: Some("1".to_string()),
            title: title.to_string(),
            class: "object.container.storageFolder".to_string(),
            storage_used: None,
        },
        items: vec![Item {
            id: "64$1$0".to_string(),
            parent_id: "64$1".to_string(),
            restricted: Some("1".to_string()),
            title: "Track 1".to_string(),
            class: "object.item.audioItem.musicTrack".to_string(),
            creator: None,
            date: None,
            album_art: None,
            resources: vec![Resource {
                protocol_info: "http-get:*:audio/flac:*".to_string(),
                size: Some("4096".to_string()),
                url: "http://nas:8200/MediaItems/1.flac".to_string(),
                ..Resource::default()
            }],
        }],
    }
}

#[derive(Default)]
struct StubSource {
    walks: AtomicUsize,
    fail: AtomicBool,
}

#[async_trait]
impl FolderSource for StubSource {
    async fn fetch_folders(&self, _cancel: &CancellationToken) -> Result<Vec<Folder>, ControlError> {
        self.walks.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(UpnpError::NotFound(
                "urn:schemas-upnp-org:service:ContentDirectory:1".to_string(),
            )
            .into());
        }
        Ok(vec![folder("Jazz & Blues")])
    }
}

/// Never answers; returns only once the token fires.
struct HangingSource;

#[async_trait]
impl FolderSource for HangingSource {
    async fn fetch_folders(&self, cancel: &CancellationToken) -> Result<Vec<Folder>, ControlError> {
        cancel.cancelled().await;
        Err(ControlError::cancelled(vec![folder("Partial")]))
    }
}

fn app(source: Arc<dyn FolderSource>, deadline: Duration) -> axum::Router {
    let cache = SnapshotCache::new(source).refresh_interval(Duration::from_secs(300));
    router(ListingState::new(
        Arc::new(cache),
        "http://nas:8200",
        deadline,
    ))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_serves_html_with_cache_headers() {
    let source = Arc::new(StubSource::default());
    let app = app(source.clone(), Duration::from_secs(5));

    let response = app.clone().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(headers[header::CACHE_CONTROL], "max-age=300");
    assert_eq!(headers[header::AGE], "0");
    assert!(headers.contains_key(header::LAST_MODIFIED));

    let html = body_text(response).await;
    assert!(html.contains("Jazz &amp; Blues"));
    assert!(html.contains("http://nas:8200/MediaItems/1.flac"));

    // second request is served from the snapshot
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(source.walks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_root_accepts_any_method() {
    let app = app(Arc::new(StubSource::default()), Duration::from_secs(5));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=300");
}

#[tokio::test]
async fn test_other_paths_are_not_found() {
    let source = Arc::new(StubSource::default());
    let app = app(source.clone(), Duration::from_secs(5));

    let response = app.oneshot(get("/favicon.ico")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "/favicon.ico Not Found");
    assert_eq!(source.walks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let source = Arc::new(StubSource::default());
    source.fail.store(true, Ordering::SeqCst);
    let app = app(source, Duration::from_secs(5));

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let text = body_text(response).await;
    assert!(text.contains("ContentDirectory:1"), "got {text}");
}

#[tokio::test]
async fn test_refresh_deadline_cancels_walk() {
    let app = app(Arc::new(HangingSource), Duration::from_millis(50));

    let response = tokio::time::timeout(Duration::from_secs(5), app.oneshot(get("/")))
        .await
        .expect("deadline did not fire")
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_text(response).await, "walk cancelled after 1 folder(s)");
}
