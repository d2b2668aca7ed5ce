//! HTTP client for a UPnP ContentDirectory (MiniDLNA and friends).

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use wdldidl::DIDLLite;

use crate::description::{DeviceDescription, resolve_control_url};
use crate::errors::UpnpError;
use crate::soap::{BROWSE_SOAP_ACTION, SOAP_CONTENT_TYPE, build_browse_request, decode_browse_response};
use crate::{CONTENT_DIRECTORY_SERVICE_TYPE, DEFAULT_HTTP_TIMEOUT, ROOT_DESCRIPTION_PATH};

/// Stateless client bound to one device base URL.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct ContentDirectoryClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ContentDirectoryClient {
    /// Create a client for the device at `base_url` (e.g. `http://127.0.0.1:8200`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client with a custom reqwest::Client
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Per-request timeout applied to every outbound call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse `{base_url}/rootDesc.xml`
    pub async fn fetch_description(&self) -> Result<DeviceDescription, UpnpError> {
        let url = format!("{}{}", self.base_url, ROOT_DESCRIPTION_PATH);
        debug!(url = url.as_str(), "Fetching device description");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| UpnpError::transport(&url, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| UpnpError::transport(&url, err))?;

        if !status.is_success() {
            return Err(UpnpError::HttpStatus {
                url,
                status: status.as_u16(),
                body,
            });
        }

        DeviceDescription::parse(&body)
    }

    /// Resolve the ContentDirectory control endpoint of the device.
    ///
    /// A device that does not advertise `ContentDirectory:1` is an error,
    /// not an empty library.
    pub async fn connect(&self) -> Result<MediaServer, UpnpError> {
        let description = self.fetch_description().await?;

        let control_path = description
            .content_directory_path()
            .filter(|path| !path.is_empty())
            .ok_or_else(|| UpnpError::NotFound(CONTENT_DIRECTORY_SERVICE_TYPE.to_string()))?;

        let control_url = resolve_control_url(&self.base_url, control_path);
        debug!(
            friendly_name = description.device.friendly_name.as_str(),
            control_url = control_url.as_str(),
            "ContentDirectory resolved"
        );

        Ok(MediaServer {
            client: self.clone(),
            friendly_name: description.device.friendly_name,
            control_url,
        })
    }

    /// POST a `Browse(BrowseDirectChildren)` for `object_id` to `control_url`
    pub async fn browse(&self, control_url: &str, object_id: &str) -> Result<DIDLLite, UpnpError> {
        debug!(control_url, object_id, "Browse");

        let response = self
            .client
            .post(control_url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .header("SOAPAction", BROWSE_SOAP_ACTION)
            .body(build_browse_request(object_id))
            .send()
            .await
            .map_err(|err| UpnpError::transport(control_url, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| UpnpError::transport(control_url, err))?;

        // SOAP faults come back as HTTP 500: surface the UPnP error when there is one.
        match decode_browse_response(&body) {
            Ok(didl) if status.is_success() => Ok(didl),
            Err(err @ UpnpError::SoapFault { .. }) => Err(err),
            Err(err) if status.is_success() => Err(err),
            _ => Err(UpnpError::HttpStatus {
                url: control_url.to_string(),
                status: status.as_u16(),
                body,
            }),
        }
    }
}

/// A device whose ContentDirectory endpoint has been resolved.
#[derive(Debug, Clone)]
pub struct MediaServer {
    client: ContentDirectoryClient,
    friendly_name: String,
    control_url: String,
}

impl MediaServer {
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    /// Direct children (containers and items) of `object_id`
    pub async fn browse(&self, object_id: &str) -> Result<DIDLLite, UpnpError> {
        self.client.browse(&self.control_url, object_id).await
    }
}
