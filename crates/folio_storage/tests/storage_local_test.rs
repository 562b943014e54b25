//! Tests for the local filesystem backend.

use folio_storage::{
    BackendKind, LocalLayout, LocalStorage, MediaStorage, StorageKey, compute_hash,
};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

fn key(raw: &str) -> StorageKey {
    StorageKey::parse(raw).unwrap()
}

#[tokio::test]
async fn test_store_and_retrieve() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    let data = b"Hello, world!";
    let key = key("uploads/hello.txt");

    let stored = storage
        .store(data.as_slice().into(), &key, "text/plain")
        .await
        .unwrap();

    assert_eq!(stored.key(), &key);
    assert_eq!(*stored.backend(), BackendKind::Local);
    assert_eq!(stored.content_type(), "text/plain");
    assert_eq!(*stored.size_bytes(), data.len() as u64);
    assert_eq!(stored.content_hash(), &compute_hash(data));
    assert!(stored.reference().starts_with("file://"));

    let retrieved = storage.retrieve(&key).await.unwrap();
    assert_eq!(retrieved.as_ref(), data);
}

#[tokio::test]
async fn test_link_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let key = key("uploads/blob.bin");
    storage
        .store(data.clone().into(), &key, "application/octet-stream")
        .await
        .unwrap();

    let link = storage
        .retrieve_link(&key, Duration::from_secs(3600))
        .await
        .unwrap()
        .expect("stored object should have a link");

    // Dereference the link and compare byte-for-byte
    let path = Url::parse(&link).unwrap().to_file_path().unwrap();
    let on_disk = std::fs::read(path).unwrap();
    assert_eq!(on_disk, data);
}

#[tokio::test]
async fn test_link_is_stable_and_ignores_ttl() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    let key = key("thumbnails/thumb_small_a.png");
    storage
        .store(b"png".as_slice().into(), &key, "image/png")
        .await
        .unwrap();

    let first = storage.retrieve_link(&key, Duration::from_secs(1)).await.unwrap();
    let second = storage
        .retrieve_link(&key, Duration::from_secs(86_400))
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_object_has_no_link() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    let link = storage
        .retrieve_link(&key("uploads/nothing.png"), Duration::from_secs(60))
        .await
        .unwrap();
    assert!(link.is_none());
}

#[tokio::test]
async fn test_namespaces_created_lazily() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    assert!(!temp_dir.path().join("thumbnails").exists());

    let key = key("thumbnails/thumb_large_x.jpg");
    storage
        .store(b"jpeg".as_slice().into(), &key, "image/jpeg")
        .await
        .unwrap();

    assert!(temp_dir.path().join("thumbnails").is_dir());
    assert!(storage.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    for i in 0..5 {
        storage
            .store(
                vec![i; 128].into(),
                &key(&format!("uploads/{i}.bin")),
                "application/octet-stream",
            )
            .await
            .unwrap();
    }

    let names: Vec<String> = std::fs::read_dir(temp_dir.path().join("uploads"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 5);
    assert!(names.iter().all(|name| !name.ends_with(".tmp")));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    let key = key("uploads/delete-me.txt");
    storage
        .store(b"Delete me".as_slice().into(), &key, "text/plain")
        .await
        .unwrap();
    assert!(storage.exists(&key).await.unwrap());

    storage.delete(&key).await.unwrap();
    storage.delete(&key).await.unwrap();
    assert!(!storage.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_retrieve_missing_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();

    let err = storage
        .retrieve(&key("uploads/ghost.bin"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.storage_kind(),
        Some(folio_storage::StorageErrorKind::NotFound(_))
    ));
}

#[tokio::test]
async fn test_directory_is_not_an_object() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();
    storage
        .store(b"a".as_slice().into(), &key("uploads/a.txt"), "text/plain")
        .await
        .unwrap();

    let namespace_dir = key("uploads");
    assert!(!storage.exists(&namespace_dir).await.unwrap());
    assert!(
        storage
            .retrieve_link(&namespace_dir, Duration::from_secs(60))
            .await
            .unwrap()
            .is_none()
    );
    let err = storage.retrieve(&namespace_dir).await.unwrap_err();
    assert!(matches!(
        err.storage_kind(),
        Some(folio_storage::StorageErrorKind::NotFound(_))
    ));

    // Nothing is stored under the key, so deleting it succeeds and leaves the directory
    storage.delete(&namespace_dir).await.unwrap();
    assert!(temp_dir.path().join("uploads").join("a.txt").is_file());
}

#[tokio::test]
async fn test_key_below_a_file_is_absent() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path()).unwrap();
    storage
        .store(b"a".as_slice().into(), &key("uploads/a.txt"), "text/plain")
        .await
        .unwrap();

    assert!(!storage.exists(&key("uploads/a.txt/inner")).await.unwrap());
}

#[tokio::test]
async fn test_flat_layout_keeps_originals_in_root() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path())
        .unwrap()
        .with_layout(LocalLayout::Flat);

    let original = key("uploads/abc.png");
    let thumbnail = key("thumbnails/thumb_small_abc.png");
    storage
        .store(b"original".as_slice().into(), &original, "image/png")
        .await
        .unwrap();
    storage
        .store(b"thumb".as_slice().into(), &thumbnail, "image/png")
        .await
        .unwrap();

    assert!(temp_dir.path().join("abc.png").is_file());
    assert!(temp_dir.path().join("thumbnails").join("thumb_small_abc.png").is_file());
    assert!(!temp_dir.path().join("uploads").exists());
    assert_eq!(storage.retrieve(&original).await.unwrap().as_ref(), b"original");
}

#[tokio::test]
async fn test_flat_layout_reads_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("thumbnails")).unwrap();
    std::fs::write(temp_dir.path().join("abc.png"), b"seeded").unwrap();
    std::fs::write(
        temp_dir.path().join("thumbnails").join("thumb_large_abc.png"),
        b"seeded thumb",
    )
    .unwrap();

    let storage = LocalStorage::new(temp_dir.path())
        .unwrap()
        .with_layout(LocalLayout::Flat);
    let original = key("uploads/abc.png");
    let thumbnail = key("thumbnails/thumb_large_abc.png");

    let link = storage
        .retrieve_link(&original, Duration::from_secs(60))
        .await
        .unwrap()
        .expect("seeded original should have a link");
    let path = Url::parse(&link).unwrap().to_file_path().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"seeded");
    assert!(storage.exists(&thumbnail).await.unwrap());

    storage.delete(&original).await.unwrap();
    storage.delete(&thumbnail).await.unwrap();
    assert!(!temp_dir.path().join("abc.png").exists());
    assert!(!temp_dir.path().join("thumbnails").join("thumb_large_abc.png").exists());
}
