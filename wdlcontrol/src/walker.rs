use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wdldidl::DIDLLite;
use wdlupnp::{ROOT_OBJECT_ID, UpnpError};

use crate::browser::ContentBrowser;
use crate::errors::ControlError;
use crate::filter::FolderFilter;
use crate::model::Folder;

/// Three-level traversal of a ContentDirectory:
/// root (`"0"`) -> top containers -> folders -> items.
///
/// Browse calls are issued sequentially. Upstream servers such as MiniDLNA
/// answer from a single thread, and fanning out measured slower than a
/// plain loop.
pub struct FolderWalker<B> {
    browser: B,
    filter: FolderFilter,
}

impl<B: ContentBrowser> FolderWalker<B> {
    pub fn new(browser: B, filter: FolderFilter) -> Self {
        Self { browser, filter }
    }

    /// Collect every non-empty, non-filtered second-level folder.
    ///
    /// A failure on the root browse is fatal. A failure on a single top
    /// container or folder is logged and the walk moves on to the next
    /// sibling. Cancellation is checked before every outbound call; the
    /// folders collected so far travel inside [`ControlError::Cancelled`].
    pub async fn walk(&self, cancel: &CancellationToken) -> Result<Vec<Folder>, ControlError> {
        let mut folders = Vec::new();

        let root = match self.browse(ROOT_OBJECT_ID, cancel).await {
            Some(result) => result?,
            None => return Err(ControlError::cancelled(folders)),
        };
        debug!(containers = root.containers.len(), "Root browsed");

        for top in &root.containers {
            if cancel.is_cancelled() {
                return Err(ControlError::cancelled(folders));
            }

            let listing = match self.browse(&top.id, cancel).await {
                Some(Ok(listing)) => listing,
                Some(Err(err)) => {
                    warn!(
                        container_id = top.id.as_str(),
                        title = top.title.as_str(),
                        error = %err,
                        "Skipping top-level container"
                    );
                    continue;
                }
                None => return Err(ControlError::cancelled(folders)),
            };

            for folder in listing.containers {
                if self.filter.skips(&folder.title) {
                    debug!(
                        folder_id = folder.id.as_str(),
                        title = folder.title.as_str(),
                        "Skipping aggregation folder"
                    );
                    continue;
                }

                let content = match self.browse(&folder.id, cancel).await {
                    Some(Ok(content)) => content,
                    Some(Err(err)) => {
                        warn!(
                            folder_id = folder.id.as_str(),
                            title = folder.title.as_str(),
                            error = %err,
                            "Skipping folder"
                        );
                        continue;
                    }
                    None => return Err(ControlError::cancelled(folders)),
                };

                if content.items.is_empty() {
                    continue;
                }

                folders.push(Folder {
                    container: folder,
                    items: content.items,
                });
            }
        }

        Ok(folders)
    }

    /// `None` when the token fired before or during the call.
    async fn browse(
        &self,
        object_id: &str,
        cancel: &CancellationToken,
    ) -> Option<Result<DIDLLite, UpnpError>> {
        if cancel.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.browser.browse_children(object_id) => Some(result),
        }
    }
}
