//! Content-directory traversal and caching core.
//!
//! [`FolderWalker`] performs the fixed three-level browse of a ContentDirectory
//! (root, top containers, folders) and keeps the non-empty folders;
//! [`SnapshotCache`] serves the last walk for a fixed interval before
//! triggering a new one.

pub mod browser;
pub mod errors;
pub mod filter;
pub mod model;
pub mod snapshot;
pub mod source;
pub mod walker;

use std::time::Duration;

pub use browser::ContentBrowser;
pub use errors::ControlError;
pub use filter::FolderFilter;
pub use model::Folder;
pub use snapshot::{Snapshot, SnapshotCache};
pub use source::{FolderSource, UpstreamFolderSource};
pub use walker::FolderWalker;

pub use tokio_util::sync::CancellationToken;

/// Default lifetime of a cached snapshot.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
