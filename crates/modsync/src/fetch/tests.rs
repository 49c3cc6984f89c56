//! Fetcher tests against a mock upstream

use super::*;
use crate::config::SyncConfig;
use crate::error::FileOperation;
use crate::progress::{ProgressCallback, ProgressEvent};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Helper struct to capture progress events during testing
#[derive(Debug, Default)]
struct ProgressCapture {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressCapture {
    fn get_callback(&self) -> ProgressCallback {
        let events = self.events.clone();
        Arc::new(move |event| {
            events.lock().unwrap().push(event);
        })
    }

    fn get_events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

async fn setup(server: &MockServer) -> (TempDir, HttpFetcher) {
    let root = tempdir().unwrap();
    let config = SyncConfig::builder()
        .upstream(server.uri())
        .revision("master")
        .root(root.path())
        .build();
    let fetcher = HttpFetcher::new(&config).unwrap();
    (root, fetcher)
}

async fn serve(server: &MockServer, resource: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/raw/commit/master/{}", resource)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_defaults_target_to_final_segment() {
    let server = MockServer::start().await;
    serve(&server, "sub/license.txt", b"MIT").await;
    let (root, fetcher) = setup(&server).await;

    let outcome = fetcher.fetch(&FetchRequest::new("sub/license.txt")).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Fetched { size: 3 });
    assert_eq!(tokio::fs::read(root.path().join("license.txt")).await.unwrap(), b"MIT");
    assert!(!root.path().join("__temp__").exists());
}

#[tokio::test]
async fn fetch_replaces_existing_destination() {
    let server = MockServer::start().await;
    serve(&server, "tree_monster.lua", b"-- fresh").await;
    let (root, fetcher) = setup(&server).await;
    tokio::fs::write(root.path().join("init.lua"), b"-- stale contents").await.unwrap();

    let request = FetchRequest::new("tree_monster.lua").with_target("init.lua");
    fetcher.fetch(&request).await.unwrap();

    assert_eq!(tokio::fs::read(root.path().join("init.lua")).await.unwrap(), b"-- fresh");
}

#[tokio::test]
async fn fetch_clears_stale_staging_directory() {
    let server = MockServer::start().await;
    serve(&server, "mod.conf", b"name = mobs_monster\n").await;
    let (root, fetcher) = setup(&server).await;
    tokio::fs::create_dir_all(root.path().join("__temp__/leftover")).await.unwrap();

    fetcher.fetch(&FetchRequest::new("mod.conf")).await.unwrap();

    assert!(root.path().join("mod.conf").is_file());
    assert!(!root.path().join("__temp__").exists());
}

#[tokio::test]
async fn non_tolerant_not_found_is_an_error_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let (root, fetcher) = setup(&server).await;

    let err = fetcher.fetch(&FetchRequest::new("mod.conf")).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        SyncError::ResourceUnavailable { url, reason } => {
            assert!(url.ends_with("/raw/commit/master/mod.conf"));
            assert!(reason.contains("404"));
        }
        other => panic!("expected ResourceUnavailable, got {:?}", other),
    }
    assert!(!root.path().join("mod.conf").exists());
    assert!(!root.path().join("__temp__").exists());
}

#[tokio::test]
async fn server_errors_collapse_into_not_found_handling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let (_root, fetcher) = setup(&server).await;

    let tolerant = FetchRequest::new("textures/mobs_tree_monster2.png").tolerate_missing();
    assert_eq!(fetcher.fetch(&tolerant).await.unwrap(), FetchOutcome::Missing);

    let strict = FetchRequest::new("license.txt");
    assert!(fetcher.fetch(&strict).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn tolerant_not_found_leaves_destination_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let (root, fetcher) = setup(&server).await;
    let capture = ProgressCapture::default();
    let fetcher = fetcher.with_progress(capture.get_callback());
    tokio::fs::write(root.path().join("license.txt"), b"old").await.unwrap();

    let outcome = fetcher
        .fetch(&FetchRequest::new("license.txt").tolerate_missing())
        .await
        .unwrap();

    assert!(outcome.is_missing());
    assert_eq!(tokio::fs::read(root.path().join("license.txt")).await.unwrap(), b"old");
    let events = capture.get_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ProgressEvent::FetchStarted { .. }));
    assert!(matches!(events[1], ProgressEvent::ResourceMissing { .. }));
}

#[tokio::test]
async fn progress_reports_start_and_completion() {
    let server = MockServer::start().await;
    serve(&server, "license.txt", b"license body").await;
    let (_root, fetcher) = setup(&server).await;
    let capture = ProgressCapture::default();
    let fetcher = fetcher.with_progress(capture.get_callback());

    fetcher.fetch(&FetchRequest::new("license.txt")).await.unwrap();

    let events = capture.get_events();
    assert_eq!(
        events[0],
        ProgressEvent::FetchStarted {
            url: format!("{}/raw/commit/master/license.txt", server.uri()),
            target: "license.txt".to_string(),
        }
    );
    assert!(matches!(events[1], ProgressEvent::FetchComplete { size: 12, .. }));
}

#[tokio::test]
async fn directory_requests_are_rejected_before_network_access() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let (_root, fetcher) = setup(&server).await;

    let err = fetcher.fetch(&FetchRequest::new("textures/")).await.unwrap_err();
    assert!(matches!(err, SyncError::DirectoryFetchUnsupported { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn request_builder_sets_fields() {
    let request = FetchRequest::new("models/mobs_tree_monster.b3d")
        .with_target("models/mobs_tree_monster.b3d")
        .tolerate_missing();
    assert!(request.tolerate_missing);
    assert_eq!(
        request.target_path().unwrap(),
        std::path::PathBuf::from("models/mobs_tree_monster.b3d")
    );
    assert!(FetchRequest::new("").target_path().is_err());
}

#[tokio::test]
async fn failed_replace_removes_staging_file() {
    let server = MockServer::start().await;
    serve(&server, "models/mobs_tree_monster.b3d", b"mesh").await;
    let (root, fetcher) = setup(&server).await;

    let err = fetcher
        .fetch(&FetchRequest::new("models/mobs_tree_monster.b3d").with_target("models/mobs_tree_monster.b3d"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::FileSystem { operation: FileOperation::Move, .. }
    ));
    assert!(!root.path().join("__temp__").exists());
    assert!(!root.path().join("models").exists());
}
