use async_trait::async_trait;
use wdldidl::DIDLLite;
use wdlupnp::{MediaServer, UpnpError};

/// Backend-agnostic browsing contract used by the walker.
#[async_trait]
pub trait ContentBrowser: Send + Sync {
    /// Direct children (containers and items) of `object_id`.
    async fn browse_children(&self, object_id: &str) -> Result<DIDLLite, UpnpError>;
}

#[async_trait]
impl ContentBrowser for MediaServer {
    async fn browse_children(&self, object_id: &str) -> Result<DIDLLite, UpnpError> {
        self.browse(object_id).await
    }
}
