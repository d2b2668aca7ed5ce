//! Construction des requêtes SOAP

use quick_xml::escape::escape;

use super::BROWSE_DIRECT_CHILDREN;
use crate::CONTENT_DIRECTORY_SERVICE_TYPE;

/// Construit une requête SOAP UPnP
///
/// Les valeurs des arguments sont échappées : un identifiant contenant `<`,
/// `&` ou `"` ne peut pas corrompre l'enveloppe.
///
/// # Arguments
///
/// * `service_urn` - URN du service (ex: "urn:schemas-upnp-org:service:ContentDirectory:1")
/// * `action` - Nom de l'action (ex: "Browse")
/// * `args` - Paires (nom, valeur), dans l'ordre attendu par le service
pub fn build_soap_request(service_urn: &str, action: &str, args: &[(&str, &str)]) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="utf-8"?>"#,
        "\n",
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#,
        "\n  <s:Body>\n"
    ));

    xml.push_str(&format!(
        "    <u:{} xmlns:u=\"{}\">\n",
        action,
        escape(service_urn)
    ));
    for (name, value) in args {
        xml.push_str(&format!("      <{name}>{}</{name}>\n", escape(*value)));
    }
    xml.push_str(&format!("    </u:{}>\n", action));
    xml.push_str("  </s:Body>\n</s:Envelope>\n");

    xml
}

/// Corps de la requête `Browse` (enfants directs, tous les champs) pour un ObjectID
pub fn build_browse_request(object_id: &str) -> String {
    build_soap_request(
        CONTENT_DIRECTORY_SERVICE_TYPE,
        "Browse",
        &[
            ("ObjectID", object_id),
            ("BrowseFlag", BROWSE_DIRECT_CHILDREN),
            ("Filter", "*"),
            ("StartingIndex", "0"),
            ("RequestedCount", "0"),
            ("SortCriteria", ""),
        ],
    )
}
