//! Filesystem backend behavior tests.

use bytes::Bytes;
use cardbox_storage::{FilesystemBackend, MediaStore, StorageError};
use tempfile::tempdir;

async fn build_backend() -> (tempfile::TempDir, FilesystemBackend) {
    let temp = tempdir().unwrap();
    let backend = FilesystemBackend::new(temp.path()).await.unwrap();
    (temp, backend)
}

#[tokio::test]
async fn put_get_roundtrip() {
    let (_temp, backend) = build_backend().await;

    backend
        .put("1712000000000-deadbeef.png", Bytes::from_static(b"pixels"))
        .await
        .unwrap();

    let data = backend.get("1712000000000-deadbeef.png").await.unwrap();
    assert_eq!(&data[..], b"pixels");
    assert!(backend.exists("1712000000000-deadbeef.png").await.unwrap());
}

#[tokio::test]
async fn put_replaces_existing_content() {
    let (_temp, backend) = build_backend().await;

    backend.put("a.png", Bytes::from_static(b"old")).await.unwrap();
    backend.put("a.png", Bytes::from_static(b"new")).await.unwrap();

    let data = backend.get("a.png").await.unwrap();
    assert_eq!(&data[..], b"new");
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let (_temp, backend) = build_backend().await;

    match backend.get("nope.png").await {
        Err(StorageError::NotFound(name)) => assert_eq!(name, "nope.png"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn delete_removes_and_reports_missing() {
    let (_temp, backend) = build_backend().await;

    backend.put("a.png", Bytes::from_static(b"x")).await.unwrap();
    backend.delete("a.png").await.unwrap();
    assert!(!backend.exists("a.png").await.unwrap());

    match backend.delete("a.png").await {
        Err(StorageError::NotFound(_)) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn list_skips_temp_files() {
    let (temp, backend) = build_backend().await;

    backend.put("b.png", Bytes::from_static(b"x")).await.unwrap();
    backend.put("a.png", Bytes::from_static(b"x")).await.unwrap();
    std::fs::write(temp.path().join(".tmp-leftover"), b"partial").unwrap();

    let names = backend.list().await.unwrap();
    assert_eq!(names, vec!["a.png".to_string(), "b.png".to_string()]);
}

#[tokio::test]
async fn rejects_path_traversal_names() {
    let (_temp, backend) = build_backend().await;

    for name in ["../escape.png", "a/b.png", "a\\b.png", "..", ""] {
        match backend.get(name).await {
            Err(StorageError::InvalidName(_)) => {}
            other => panic!("{name}: unexpected {other:?}"),
        }
        match backend.put(name, Bytes::from_static(b"x")).await {
            Err(StorageError::InvalidName(_)) => {}
            other => panic!("{name}: unexpected {other:?}"),
        }
    }
}
