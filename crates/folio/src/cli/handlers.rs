//! Command handlers.

use folio::{Folio, FolioResult, MediaStorage, Namespace, StorageKey};
use serde_json::json;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

type HandlerResult = Result<ExitCode, Box<dyn Error>>;

fn print_json(value: &impl serde::Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Upload a file and print the upload report.
pub async fn upload(
    folio: &Folio,
    path: &Path,
    name: Option<&str>,
    content_type: Option<&str>,
) -> HandlerResult {
    let filename = match name {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let file = std::fs::File::open(path)?;
    let report = folio
        .uploads()
        .upload_reader(file, &filename, content_type)
        .await?;

    print_json(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Print a link to `key`, failing when the object is absent.
pub async fn link(folio: &Folio, key: &str, ttl: Option<u64>) -> HandlerResult {
    let key = StorageKey::parse(key)?;
    match folio.link(&key, ttl.map(Duration::from_secs)).await? {
        Some(link) => {
            println!("{}", link);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No object stored under {}", key);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Delete an original and its thumbnails, printing the deletion report.
///
/// Exits non-zero only when every delete failed.
pub async fn delete(
    folio: &Folio,
    key: &str,
    thumbnails: &[String],
    all_sizes: bool,
) -> HandlerResult {
    let original = original_key(key)?;

    let report = if all_sizes {
        folio.deletions().delete_all_sizes(&original).await
    } else {
        let references: Vec<&str> = thumbnails.iter().map(String::as_str).collect();
        folio
            .deletions()
            .delete_with_references(&original, &references)
            .await
    };

    print_json(&report)?;
    if report.is_total_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print the selected backend and any downgrade reason.
pub fn backend(folio: &Folio) -> HandlerResult {
    print_json(&json!({
        "backend": folio.backend().kind(),
        "downgrade": folio.downgrade(),
    }))?;
    Ok(ExitCode::SUCCESS)
}

/// Accept either an `uploads/...` key or a reference to the original.
fn original_key(raw: &str) -> FolioResult<StorageKey> {
    match StorageKey::parse(raw) {
        Ok(key) if key.namespace() == Some(Namespace::Uploads) => Ok(key),
        _ => StorageKey::from_reference(raw, Namespace::Uploads),
    }
}
