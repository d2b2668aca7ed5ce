use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpnpError {
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} failed with HTTP status {status} and body: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[error("{action} returned UPnP error {code}: {description}")]
    SoapFault {
        action: String,
        code: u32,
        description: String,
    },
    // Keeps the whole offending document: vendor XML is the usual culprit.
    #[error("parse {raw:?}: {reason}")]
    Parse { raw: String, reason: String },
    #[error("unmarshal {raw:?}: {reason}")]
    Decode { raw: String, reason: String },
    #[error("no {0} service advertised by the device")]
    NotFound(String),
}

impl UpnpError {
    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        UpnpError::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub fn parse(raw: &str, reason: impl ToString) -> Self {
        UpnpError::Parse {
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(raw: &str, reason: impl ToString) -> Self {
        UpnpError::Decode {
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Raw upstream text attached to the error, if any.
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            UpnpError::Parse { raw, .. } | UpnpError::Decode { raw, .. } => Some(raw),
            UpnpError::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
