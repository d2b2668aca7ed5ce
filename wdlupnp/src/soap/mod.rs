//! # Module SOAP
//!
//! Encodage de la requête `Browse` et décodage de sa réponse.
//!
//! La réponse est une double enveloppe : l'enveloppe SOAP contient un champ
//! `Result` dont le texte (échappé) est lui-même un document DIDL-Lite complet.
//!
//! ## Example
//!
//! ```
//! use wdlupnp::soap::{build_browse_request, decode_browse_response};
//!
//! let request = build_browse_request("64$1");
//! assert!(request.contains("<ObjectID>64$1</ObjectID>"));
//!
//! let response = r#"<?xml version="1.0"?>
//! <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
//!   <s:Body>
//!     <u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1">
//!       <Result>&lt;DIDL-Lite&gt;&lt;/DIDL-Lite&gt;</Result>
//!       <NumberReturned>0</NumberReturned>
//!     </u:BrowseResponse>
//!   </s:Body>
//! </s:Envelope>"#;
//! let didl = decode_browse_response(response).unwrap();
//! assert!(didl.is_empty());
//! ```

mod builder;
mod envelope;
mod parser;

pub use builder::{build_browse_request, build_soap_request};
pub use envelope::{SoapBody, SoapEnvelope, SoapHeader};
pub use parser::{
    SoapFault, SoapParseError, decode_browse_response, extract_result_payload, parse_soap_envelope,
    parse_soap_fault,
};

/// Content-Type des requêtes SOAP
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// En-tête SOAPAction de l'action `Browse`
pub const BROWSE_SOAP_ACTION: &str = "urn:schemas-upnp-org:service:ContentDirectory:1#Browse";

pub const BROWSE_DIRECT_CHILDREN: &str = "BrowseDirectChildren";
