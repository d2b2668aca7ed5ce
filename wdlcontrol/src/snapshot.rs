use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::DEFAULT_REFRESH_INTERVAL;
use crate::errors::ControlError;
use crate::model::Folder;
use crate::source::FolderSource;

/// Result of one successful walk, replaced wholesale on every refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    folders: Arc<Vec<Folder>>,
    filled_at: Instant,
    filled_at_utc: DateTime<Utc>,
}

impl Snapshot {
    fn new(folders: Vec<Folder>, filled_at: Instant) -> Self {
        Self {
            folders: Arc::new(folders),
            filled_at,
            filled_at_utc: Utc::now(),
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn filled_at(&self) -> Instant {
        self.filled_at
    }

    /// Wall-clock time of the fill, for `Last-Modified`.
    pub fn filled_at_utc(&self) -> DateTime<Utc> {
        self.filled_at_utc
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.filled_at)
    }
}

/// Time-boxed cache of the folder listing.
///
/// A single lock covers the check and the refill: requests arriving during
/// a refresh wait for it and are then served from the new snapshot.
pub struct SnapshotCache {
    source: Arc<dyn FolderSource>,
    refresh_interval: Duration,
    serve_stale_on_error: bool,
    state: Mutex<Option<Snapshot>>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn FolderSource>) -> Self {
        Self {
            source,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            serve_stale_on_error: false,
            state: Mutex::new(None),
        }
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Serve the previous snapshot when a refresh fails instead of the error.
    pub fn serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    pub fn interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Return the cached snapshot while `filled_at + interval > now`,
    /// otherwise walk the upstream server and replace it.
    ///
    /// A failed refresh leaves the previous snapshot untouched.
    pub async fn get_or_refresh(
        &self,
        now: Instant,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, ControlError> {
        let mut state = self.state.lock().await;

        if let Some(snapshot) = state.as_ref() {
            if snapshot.filled_at + self.refresh_interval > now {
                info!(
                    "serving from cache of {}",
                    snapshot.filled_at_utc.format("%Y-%m-%d %H:%M:%S UTC")
                );
                return Ok(snapshot.clone());
            }
        }

        let started = Instant::now();
        match self.source.fetch_folders(cancel).await {
            Ok(folders) => {
                let snapshot = Snapshot::new(folders, now);
                *state = Some(snapshot.clone());
                info!(
                    folders = snapshot.folders().len(),
                    "fresh data retrieved in {:?}",
                    started.elapsed()
                );
                Ok(snapshot)
            }
            Err(err) => match state.as_ref() {
                Some(stale) if self.serve_stale_on_error => {
                    warn!(error = %err, "Refresh failed, serving stale snapshot");
                    Ok(stale.clone())
                }
                _ => Err(err),
            },
        }
    }

    /// Current snapshot without triggering a refresh.
    pub async fn peek(&self) -> Option<Snapshot> {
        self.state.lock().await.clone()
    }
}
