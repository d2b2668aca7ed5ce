//! Décodage des réponses SOAP

use std::io::BufReader;

use wdldidl::{DIDLLite, MediaMetadataParser};
use xmltree::{Element, XMLNode};

use super::{SoapBody, SoapEnvelope, SoapHeader};
use crate::errors::UpnpError;

/// Erreur de parsing SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,
}

/// Fault UPnP extrait d'un `s:Fault`
#[derive(Debug, Clone, PartialEq)]
pub struct SoapFault {
    pub error_code: u32,
    pub error_description: String,
}

/// Parse une enveloppe SOAP complète
pub fn parse_soap_envelope(xml: &[u8]) -> Result<SoapEnvelope, SoapParseError> {
    let reader = BufReader::new(xml);
    let root = Element::parse(reader)?;

    if !root.name.ends_with("Envelope") {
        return Err(SoapParseError::MissingEnvelope);
    }

    let header = find_child_with_suffix(&root, "Header").map(|e| SoapHeader { content: e.clone() });

    let body_elem = find_child_with_suffix(&root, "Body").ok_or(SoapParseError::MissingBody)?;

    Ok(SoapEnvelope {
        header,
        body: SoapBody {
            content: body_elem.clone(),
        },
    })
}

/// Texte du champ `Result` de `<u:{response_suffix}>`, déséchappé
pub fn extract_result_payload(envelope: &SoapEnvelope, response_suffix: &str) -> Option<String> {
    let response = find_child_with_suffix(&envelope.body.content, response_suffix)?;
    let result_elem = find_child_with_suffix(response, "Result")?;

    Some(
        result_elem
            .get_text()
            .map(|t| t.to_string())
            .unwrap_or_default(),
    )
}

/// Extrait le code et la description d'un `UPnPError`, s'il y en a un
pub fn parse_soap_fault(envelope: &SoapEnvelope) -> Option<SoapFault> {
    let fault = find_child_with_suffix(&envelope.body.content, "Fault")?;
    let detail = find_child_with_suffix(fault, "detail")?;
    let upnp_error = find_child_with_suffix(detail, "UPnPError")?;

    let error_code = find_child_with_suffix(upnp_error, "errorCode")?
        .get_text()?
        .trim()
        .parse::<u32>()
        .ok()?;

    let error_description = find_child_with_suffix(upnp_error, "errorDescription")
        .and_then(|e| e.get_text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    Some(SoapFault {
        error_code,
        error_description,
    })
}

/// Décode la réponse d'un `Browse` : enveloppe SOAP puis DIDL-Lite embarqué
///
/// Les deux étapes conservent le texte fautif dans l'erreur.
pub fn decode_browse_response(body: &str) -> Result<DIDLLite, UpnpError> {
    let envelope =
        parse_soap_envelope(body.as_bytes()).map_err(|err| UpnpError::decode(body, err))?;

    if let Some(fault) = parse_soap_fault(&envelope) {
        return Err(UpnpError::SoapFault {
            action: "Browse".to_string(),
            code: fault.error_code,
            description: fault.error_description,
        });
    }

    let payload = extract_result_payload(&envelope, "BrowseResponse")
        .ok_or_else(|| UpnpError::decode(body, "missing BrowseResponse/Result element"))?;

    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(DIDLLite::default());
    }

    DIDLLite::parse(trimmed).map_err(|err| UpnpError::decode(&payload, err))
}

fn find_child_with_suffix<'a>(parent: &'a Element, suffix: &str) -> Option<&'a Element> {
    parent.children.iter().find_map(|node| match node {
        XMLNode::Element(elem) if elem.name.ends_with(suffix) => Some(elem),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CONTAINERS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1">
      <Result>&lt;DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"&gt;
&lt;container id="64$0" parentID="64" restricted="1" childCount="3"&gt;&lt;dc:title&gt;Rock&lt;/dc:title&gt;&lt;upnp:class&gt;object.container.storageFolder&lt;/upnp:class&gt;&lt;/container&gt;
&lt;container id="64$1" parentID="64" restricted="1" childCount="5"&gt;&lt;dc:title&gt;Jazz &amp;amp; Blues&lt;/dc:title&gt;&lt;upnp:class&gt;object.container.storageFolder&lt;/upnp:class&gt;&lt;/container&gt;
&lt;/DIDL-Lite&gt;</Result>
      <NumberReturned>2</NumberReturned>
      <TotalMatches>2</TotalMatches>
      <UpdateID>7</UpdateID>
    </u:BrowseResponse>
  </s:Body>
</s:Envelope>"#;

    #[test]
    fn test_decode_two_containers_in_order() {
        let didl = decode_browse_response(TWO_CONTAINERS).unwrap();

        assert_eq!(didl.containers.len(), 2);
        assert!(didl.items.is_empty());
        assert_eq!(didl.containers[0].id, "64$0");
        assert_eq!(didl.containers[0].title, "Rock");
        assert_eq!(didl.containers[1].id, "64$1");
        assert_eq!(didl.containers[1].title, "Jazz & Blues");
    }

    #[test]
    fn test_malformed_envelope_keeps_raw_body() {
        let body = "<s:Envelope><s:Body></s:Envelope>";
        match decode_browse_response(body) {
            Err(UpnpError::Decode { raw, .. }) => assert_eq!(raw, body),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_didl_keeps_raw_payload() {
        let body = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1"><Result>&lt;DIDL-Lite&gt;&lt;item&gt;</Result></u:BrowseResponse>
</s:Body></s:Envelope>"#;

        let err = decode_browse_response(body).unwrap_err();
        assert_eq!(err.raw_payload(), Some("<DIDL-Lite><item>"));
        assert!(err.to_string().starts_with("unmarshal"));
    }

    #[test]
    fn test_empty_result_is_empty_listing() {
        let body = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1"><Result></Result><NumberReturned>0</NumberReturned></u:BrowseResponse>
</s:Body></s:Envelope>"#;

        assert!(decode_browse_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_fault_is_reported() {
        let body = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <s:Fault>
      <faultcode>s:Client</faultcode>
      <faultstring>UPnPError</faultstring>
      <detail>
        <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
          <errorCode>701</errorCode>
          <errorDescription>No such object</errorDescription>
        </UPnPError>
      </detail>
    </s:Fault>
  </s:Body>
</s:Envelope>"#;

        match decode_browse_response(body) {
            Err(UpnpError::SoapFault {
                code, description, ..
            }) => {
                assert_eq!(code, 701);
                assert_eq!(description, "No such object");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
