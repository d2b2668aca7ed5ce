//! Structures de l'enveloppe SOAP

use xmltree::Element;

/// Enveloppe SOAP complète
#[derive(Debug, Clone)]
pub struct SoapEnvelope {
    /// En-tête SOAP optionnel
    pub header: Option<SoapHeader>,

    /// Corps SOAP contenant la réponse ou le fault
    pub body: SoapBody,
}

/// En-tête SOAP
#[derive(Debug, Clone)]
pub struct SoapHeader {
    pub content: Element,
}

/// Corps SOAP
#[derive(Debug, Clone)]
pub struct SoapBody {
    pub content: Element,
}
