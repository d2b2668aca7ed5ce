use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use wdlupnp::ContentDirectoryClient;

use crate::errors::ControlError;
use crate::filter::FolderFilter;
use crate::model::Folder;
use crate::walker::FolderWalker;

/// Producer of a complete folder listing, consumed by the snapshot cache.
#[async_trait]
pub trait FolderSource: Send + Sync {
    async fn fetch_folders(&self, cancel: &CancellationToken) -> Result<Vec<Folder>, ControlError>;
}

/// Resolves the device description, then walks its ContentDirectory.
///
/// The description is fetched again on every call: the control path is not
/// kept between refreshes.
#[derive(Debug, Clone)]
pub struct UpstreamFolderSource {
    client: ContentDirectoryClient,
    filter: FolderFilter,
}

impl UpstreamFolderSource {
    pub fn new(client: ContentDirectoryClient, filter: FolderFilter) -> Self {
        Self { client, filter }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl FolderSource for UpstreamFolderSource {
    async fn fetch_folders(&self, cancel: &CancellationToken) -> Result<Vec<Folder>, ControlError> {
        if cancel.is_cancelled() {
            return Err(ControlError::cancelled(Vec::new()));
        }

        let server = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ControlError::cancelled(Vec::new())),
            server = self.client.connect() => server?,
        };
        debug!(
            friendly_name = server.friendly_name(),
            control_url = server.control_url(),
            "Walking ContentDirectory"
        );

        FolderWalker::new(server, self.filter.clone())
            .walk(cancel)
            .await
    }
}
