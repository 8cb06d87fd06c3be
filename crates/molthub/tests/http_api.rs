//! HTTP behavior of the release hub.

use molt_common::protocol::{ErrorResponse, LatestResponse, PingResponse, VersionsResponse};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

async fn serve(root: PathBuf) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        molthub::serve(listener, root).await.unwrap();
    });
    format!("http://{}", addr)
}

fn release_root() -> TempDir {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("v1.2.0"), b"bin-1.2.0").unwrap();
    fs::write(root.path().join("v1.9.1"), b"bin-1.9.1").unwrap();
    fs::write(root.path().join("v1.10.0"), b"bin-1.10.0").unwrap();
    root
}

#[tokio::test]
async fn ping_pongs() {
    let root = release_root();
    let base = serve(root.path().to_path_buf()).await;

    let body: PingResponse = reqwest::get(format!("{}/ping", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.response, "pong");
}

#[tokio::test]
async fn versions_are_sorted_by_precedence() {
    let root = release_root();
    let base = serve(root.path().to_path_buf()).await;

    let body: VersionsResponse = reqwest::get(format!("{}/versions", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.versions, vec!["v1.2.0", "v1.9.1", "v1.10.0"]);
}

#[tokio::test]
async fn latest_picks_semver_max_not_lexicographic() {
    let root = release_root();
    let base = serve(root.path().to_path_buf()).await;

    let body: LatestResponse = reqwest::get(format!("{}/latest", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.latest, "v1.10.0");
}

#[tokio::test]
async fn latest_on_empty_root_is_not_found() {
    let root = TempDir::new().unwrap();
    let base = serve(root.path().to_path_buf()).await;

    let resp = reqwest::get(format!("{}/latest", base)).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: ErrorResponse = resp.json().await.unwrap();
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn download_roundtrips_bytes() {
    let root = release_root();
    let base = serve(root.path().to_path_buf()).await;

    let resp = reqwest::get(format!("{}/download/v1.9.1", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"],
        "application/octet-stream"
    );
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"bin-1.9.1");
}

#[tokio::test]
async fn download_of_unknown_version_is_not_found() {
    let root = release_root();
    let base = serve(root.path().to_path_buf()).await;

    let resp = reqwest::get(format!("{}/download/v9.9.9", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_rejects_path_traversal() {
    let root = release_root();
    let base = serve(root.path().to_path_buf()).await;

    let resp = reqwest::get(format!("{}/download/..%2Fsecret", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}
