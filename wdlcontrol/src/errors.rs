use thiserror::Error;
use wdlupnp::UpnpError;

use crate::model::Folder;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error(transparent)]
    Upnp(#[from] UpnpError),
    /// The walk observed a cancellation; `collected` holds the folders
    /// gathered before it stopped.
    #[error("walk cancelled after {} folder(s)", .collected.len())]
    Cancelled { collected: Vec<Folder> },
}

impl ControlError {
    pub fn cancelled(collected: Vec<Folder>) -> Self {
        ControlError::Cancelled { collected }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ControlError::Cancelled { .. })
    }
}
