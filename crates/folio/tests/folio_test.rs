//! End-to-end tests through the facade.

use bytes::Bytes;
use folio::{
    BackendKind, CancellationToken, Folio, FolioConfig, LocalConfig, MediaStorage, RemoteConfig,
    StorageConfig, StorageKey,
};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

fn local_config(temp_dir: &TempDir) -> FolioConfig {
    FolioConfig {
        storage: StorageConfig {
            prefer_remote: false,
            local: LocalConfig {
                root: temp_dir.path().join("media"),
                ..Default::default()
            },
            remote: RemoteConfig::default(),
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_upload_link_delete_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let folio = Folio::start(local_config(&temp_dir), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(folio.backend().kind(), BackendKind::Local);
    assert!(folio.downgrade().is_none());

    let report = folio
        .uploads()
        .upload_with_thumbnails(Bytes::from_static(b"abc 123"), "todo.txt", None)
        .await
        .unwrap();
    let key = report.original().key().clone();

    // The link dereferences to the exact bytes stored
    let link = folio.link(&key, None).await.unwrap().unwrap();
    let path = Url::parse(&link).unwrap().to_file_path().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"abc 123");

    let deletion = folio.deletions().delete_all_sizes(&key).await;
    assert!(deletion.is_complete());
    assert_eq!(folio.link(&key, Some(Duration::from_secs(5))).await.unwrap(), None);
}

#[tokio::test]
async fn test_unconfigured_remote_downgrades_at_start() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = local_config(&temp_dir);
    config.storage.prefer_remote = true;

    let folio = Folio::start(config, CancellationToken::new()).await.unwrap();
    assert_eq!(folio.backend().kind(), BackendKind::Local);
    assert!(folio.downgrade().is_some());

    let key = StorageKey::parse("uploads/direct.txt").unwrap();
    folio
        .backend()
        .store(Bytes::from_static(b"direct"), &key, "text/plain")
        .await
        .unwrap();
    assert!(folio.backend().exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_upload_folder_deployment_files_stay_reachable() {
    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("uploads");
    std::fs::create_dir_all(folder.join("thumbnails")).unwrap();
    std::fs::write(folder.join("abc.png"), b"existing original").unwrap();
    std::fs::write(
        folder.join("thumbnails").join("thumb_small_abc.png"),
        b"existing thumb",
    )
    .unwrap();

    let env = HashMap::from([(
        "UPLOAD_FOLDER".to_string(),
        folder.to_string_lossy().into_owned(),
    )]);
    let config = FolioConfig::load_with_env(None, Some(env)).unwrap();
    let folio = Folio::start(config, CancellationToken::new()).await.unwrap();

    let key = StorageKey::parse("uploads/abc.png").unwrap();
    let link = folio.link(&key, None).await.unwrap().unwrap();
    let path = Url::parse(&link).unwrap().to_file_path().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"existing original");

    let deletion = folio.deletions().delete_all_sizes(&key).await;
    assert!(deletion.is_complete());
    assert_eq!(deletion.deleted().len(), 4);
    assert!(!folder.join("abc.png").exists());
    assert!(!folder.join("thumbnails").join("thumb_small_abc.png").exists());

    // New uploads land in the same layout
    let report = folio
        .uploads()
        .upload_with_thumbnails(Bytes::from_static(b"new"), "new.txt", None)
        .await
        .unwrap();
    let file_name = report.original().key().file_name().to_string();
    assert!(folder.join(file_name).is_file());
}
