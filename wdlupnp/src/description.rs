//! Device description (`rootDesc.xml`) model and ContentDirectory lookup.

use serde::Deserialize;

use crate::CONTENT_DIRECTORY_SERVICE_TYPE;
use crate::errors::UpnpError;

/// Parsed UPnP device description.
///
/// Only the fields this tool reads are modelled; anything else in the
/// document is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "root")]
pub struct DeviceDescription {
    #[serde(rename = "specVersion", default)]
    pub spec_version: Option<SpecVersion>,

    #[serde(rename = "URLBase", default)]
    pub url_base: Option<String>,

    pub device: Device,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecVersion {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Device {
    #[serde(rename = "deviceType", default)]
    pub device_type: String,

    #[serde(rename = "friendlyName", default)]
    pub friendly_name: String,

    #[serde(default)]
    pub manufacturer: String,

    #[serde(rename = "modelName", default)]
    pub model_name: String,

    #[serde(rename = "modelNumber", default)]
    pub model_number: String,

    #[serde(rename = "UDN", default)]
    pub udn: String,

    #[serde(rename = "presentationURL", default)]
    pub presentation_url: Option<String>,

    #[serde(rename = "serviceList", default)]
    pub service_list: ServiceList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Service {
    #[serde(rename = "serviceType", default)]
    pub service_type: String,

    #[serde(rename = "serviceId", default)]
    pub service_id: String,

    #[serde(rename = "controlURL", default)]
    pub control_url: String,

    #[serde(rename = "eventSubURL", default)]
    pub event_sub_url: String,

    #[serde(rename = "SCPDURL", default)]
    pub scpd_url: String,
}

impl DeviceDescription {
    /// Parse a description document. Malformed XML is reported with the
    /// raw document attached, never panics.
    pub fn parse(xml: &str) -> Result<Self, UpnpError> {
        quick_xml::de::from_str(xml).map_err(|err| UpnpError::parse(xml, err))
    }

    pub fn services(&self) -> &[Service] {
        &self.device.service_list.services
    }

    /// Control path of the `ContentDirectory:1` service, if the device has one.
    pub fn content_directory_path(&self) -> Option<&str> {
        self.services()
            .iter()
            .find(|svc| svc.service_type.trim() == CONTENT_DIRECTORY_SERVICE_TYPE)
            .map(|svc| svc.control_url.trim())
    }
}

/// Resolve a possibly relative controlURL against the device base URL.
///
/// - An absolute `control_url` (http:// or https://) is returned as-is.
/// - Otherwise it is appended to `base_url`, adding the separating `/` when missing.
pub fn resolve_control_url(base_url: &str, control_url: &str) -> String {
    if control_url.starts_with("http://") || control_url.starts_with("https://") {
        return control_url.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if control_url.starts_with('/') {
        format!("{}{}", base, control_url)
    } else {
        format!("{}/{}", base, control_url)
    }
}
