//! UPnP ContentDirectory client plumbing: device description resolution,
//! SOAP `Browse` encoding/decoding and the HTTP client that ties them together.

pub mod client;
pub mod description;
pub mod errors;
pub mod soap;

use std::time::Duration;

pub use client::{ContentDirectoryClient, MediaServer};
pub use description::{DeviceDescription, Service, resolve_control_url};
pub use errors::UpnpError;

/// Service type advertised by a UPnP ContentDirectory, version 1.
pub const CONTENT_DIRECTORY_SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";

/// Path of the device description document, relative to the device base URL.
pub const ROOT_DESCRIPTION_PATH: &str = "/rootDesc.xml";

/// Object ID of the root of every ContentDirectory tree.
pub const ROOT_OBJECT_ID: &str = "0";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8200";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
