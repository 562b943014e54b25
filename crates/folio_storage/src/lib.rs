//! Media storage port for Folio.
//!
//! This crate hides two interchangeable storage substrates behind one
//! [`MediaStorage`] contract:
//!
//! - [`LocalStorage`]: a directory tree, no network failure modes
//! - [`RemoteStorage`]: an S3-compatible bucket with signed, time-limited links
//!
//! [`BackendSelector`] decides once at startup which one the process uses.
//!
//! # Features
//!
//! - **Validated keys**: [`StorageKey`] rejects empty and path-escaping keys
//! - **Atomic writes**: Objects are either fully stored or not stored at all
//! - **Idempotent deletes**: Deleting an absent key succeeds
//! - **Bounded remote calls**: Every network call has a deadline and can be cancelled
//!
//! # Example
//!
//! ```rust
//! use folio_storage::{LocalStorage, MediaStorage, StorageKey};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = LocalStorage::new("/tmp/folio-media")?;
//! let key = StorageKey::parse("uploads/notes.txt")?;
//!
//! // Store an object
//! let stored = storage.store("hello".into(), &key, "text/plain").await?;
//! assert_eq!(*stored.size_bytes(), 5);
//!
//! // Get a link to it
//! let link = storage.retrieve_link(&key, Duration::from_secs(60)).await?;
//! assert!(link.is_some());
//!
//! // Delete it (twice is fine)
//! storage.delete(&key).await?;
//! storage.delete(&key).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod key;
mod local;
mod object;
mod remote;
mod selector;
mod storage;

pub use config::{LocalConfig, LocalLayout, RemoteConfig, StorageConfig};
pub use folio_error::{StorageError, StorageErrorKind};
pub use key::{Namespace, StorageKey};
pub use local::LocalStorage;
pub use object::{BackendKind, StoredObject, compute_hash};
pub use remote::{DEFAULT_TIMEOUT, RemoteStorage};
pub use selector::{BackendSelection, BackendSelector, StorageBackend};
pub use storage::MediaStorage;

pub use tokio_util::sync::CancellationToken;
